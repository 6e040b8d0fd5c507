// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON over HTTP session with a RIB service.
//!
//! `list` answers with newline delimited JSON, one destination per line, so
//! large tables are handed to the caller as they arrive.

use crate::error::Error;
use crate::log::rib_log;
use crate::session::{
    AddPathRequest, AddPathResponse, DeletePathRequest, DestinationStream,
    GlobalConfig, ListPathRequest, Session,
};
use crate::MOD_SESSION;
use async_trait::async_trait;
use bgp_attr::DestinationMessage;
use reqwest::{Client, Response};
use serde::Serialize;
use slog::Logger;
use std::time::Duration;
use tokio::sync::mpsc::{channel, Sender};
use uuid::Uuid;

const STREAM_DEPTH: usize = 0x100;

pub struct HttpSession {
    baseurl: String,
    client: Client,
    log: Logger,
}

impl HttpSession {
    pub fn new(baseurl: &str, log: Logger) -> Result<Self, Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            baseurl: baseurl.trim_end_matches('/').to_owned(),
            client,
            log,
        })
    }

    pub fn baseurl(&self) -> &str {
        &self.baseurl
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        timeout: Duration,
    ) -> Result<Response, Error> {
        let uri = format!("{}{}", self.baseurl, path);
        rib_log!(self.log, trace, MOD_SESSION, "client request";
            "method" => "POST",
            "uri" => uri.clone()
        );
        let result = self
            .client
            .post(&uri)
            .timeout(timeout)
            .json(body)
            .send()
            .await;
        self.check(result).await
    }

    async fn get(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<Response, Error> {
        let uri = format!("{}{}", self.baseurl, path);
        rib_log!(self.log, trace, MOD_SESSION, "client request";
            "method" => "GET",
            "uri" => uri.clone()
        );
        let result = self.client.get(&uri).timeout(timeout).send().await;
        self.check(result).await
    }

    async fn check(
        &self,
        result: Result<Response, reqwest::Error>,
    ) -> Result<Response, Error> {
        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                rib_log!(self.log, trace, MOD_SESSION, "client response";
                    "error" => e.to_string()
                );
                return Err(e.into());
            }
        };
        let status = resp.status();
        rib_log!(self.log, trace, MOD_SESSION, "client response";
            "status" => status.as_u16()
        );
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Rejected(format!("{status}: {}", body.trim())))
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn list_paths(
        &self,
        req: &ListPathRequest,
        timeout: Duration,
    ) -> Result<DestinationStream, Error> {
        let resp = self.post("/v1/paths/list", req, timeout).await?;
        let (tx, rx) = channel(STREAM_DEPTH);
        let log = self.log.clone();
        tokio::spawn(async move {
            if let Err(e) = read_destinations(resp, &tx).await {
                rib_log!(log, debug, MOD_SESSION,
                    "destination stream failed: {}", e
                );
                // the receiver may already be gone, nothing left to tell
                let _ = tx.send(Err(e)).await;
            }
        });
        Ok(rx)
    }

    async fn add_path(
        &self,
        req: &AddPathRequest,
        timeout: Duration,
    ) -> Result<Uuid, Error> {
        let resp = self.post("/v1/paths/add", req, timeout).await?;
        let body: AddPathResponse = resp.json().await?;
        Ok(body.uuid)
    }

    async fn delete_path(
        &self,
        req: &DeletePathRequest,
        timeout: Duration,
    ) -> Result<(), Error> {
        self.post("/v1/paths/delete", req, timeout).await?;
        Ok(())
    }

    async fn get_global_config(
        &self,
        timeout: Duration,
    ) -> Result<GlobalConfig, Error> {
        let resp = self.get("/v1/global", timeout).await?;
        Ok(resp.json().await?)
    }
}

/// Split a response body into lines and forward each decoded destination.
/// Returns early without error if the receiver hangs up.
async fn read_destinations(
    mut resp: Response,
    tx: &Sender<Result<DestinationMessage, Error>>,
) -> Result<(), Error> {
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = resp.chunk().await? {
        buf.extend_from_slice(&chunk);
        while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = buf.drain(..=pos).collect();
            if !forward_line(&line, tx).await? {
                return Ok(());
            }
        }
    }
    forward_line(&buf, tx).await?;
    Ok(())
}

async fn forward_line(
    line: &[u8],
    tx: &Sender<Result<DestinationMessage, Error>>,
) -> Result<bool, Error> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(true);
    }
    let dst: DestinationMessage = serde_json::from_slice(line)?;
    Ok(tx.send(Ok(dst)).await.is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{TableKind, TableLookupPrefix};
    use bgp_attr::{AddressFamily, Path, PathAttribute, PathOrigin};
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc::channel;
    use tokio::task::JoinHandle;

    const TIMEOUT: Duration = Duration::from_secs(2);
    const LAST_CHUNK: &[u8] = b"0\r\n\r\n";

    fn logger() -> Logger {
        Logger::root(slog::Discard, slog::o!())
    }

    /// Accept a single connection, write `parts` in order with a short pause
    /// between them and keep the socket open for `hold`. Resolves to the
    /// request as received.
    async fn serve(
        parts: Vec<Vec<u8>>,
        hold: Duration,
    ) -> (HttpSession, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let request = read_request(&mut sock).await;
            for part in parts {
                sock.write_all(&part).await.unwrap();
                sock.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            tokio::time::sleep(hold).await;
            request
        });
        let session =
            HttpSession::new(&format!("http://{addr}"), logger()).unwrap();
        (session, handle)
    }

    async fn read_request(sock: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).into_owned();
            let Some(end) = text.find("\r\n\r\n") else {
                continue;
            };
            let length = text[..end]
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn response(status: &str, body: &str) -> Vec<u8> {
        format!(
            "HTTP/1.1 {status}\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        )
        .into_bytes()
    }

    fn chunked_head() -> Vec<u8> {
        b"HTTP/1.1 200 OK\r\n\
          content-type: application/x-ndjson\r\n\
          transfer-encoding: chunked\r\n\
          connection: close\r\n\r\n"
            .to_vec()
    }

    fn chunk(data: &str) -> Vec<u8> {
        format!("{:x}\r\n{data}\r\n", data.len()).into_bytes()
    }

    fn list_req() -> ListPathRequest {
        ListPathRequest {
            table_type: TableKind::Global,
            name: None,
            family: AddressFamily::Ipv4Unicast.to_wire(),
            prefixes: vec![TableLookupPrefix {
                prefix: "10.0.0.0/8".into(),
            }],
        }
    }

    fn path_message() -> bgp_attr::PathMessage {
        Path::new(
            "10.0.0.0/24".parse().unwrap(),
            AddressFamily::Ipv4Unicast,
            vec![PathAttribute::Origin(PathOrigin::Igp)],
        )
        .to_message()
        .unwrap()
    }

    #[tokio::test]
    async fn list_lines_span_chunks() {
        let (session, server) = serve(
            vec![
                chunked_head(),
                chunk(r#"{"prefix":"10.0.1.0/24","paths":[]}"#),
                chunk("\n{\"prefix\":\"10.0."),
                chunk("0.0/24\",\"paths\":[]}\n\n{\"prefix\":\"10.0.0.0/25\","),
                // last line has no trailing newline
                chunk(r#""paths":[]}"#),
                LAST_CHUNK.to_vec(),
            ],
            Duration::ZERO,
        )
        .await;

        let mut rx = session.list_paths(&list_req(), TIMEOUT).await.unwrap();
        let mut seen = Vec::new();
        while let Some(d) = rx.recv().await {
            seen.push(d.unwrap().prefix);
        }
        assert_eq!(seen, vec!["10.0.1.0/24", "10.0.0.0/24", "10.0.0.0/25"]);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/paths/list HTTP/1.1\r\n"));
        assert!(request.contains(r#""table_type":"global""#));
        assert!(request.contains(r#""prefix":"10.0.0.0/8""#));
    }

    #[tokio::test]
    async fn add_path_returns_uuid() {
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let (session, server) = serve(
            vec![response("200 OK", &format!(r#"{{"uuid":"{id}"}}"#))],
            Duration::ZERO,
        )
        .await;
        let req = AddPathRequest {
            table_type: TableKind::Global,
            path: path_message(),
        };
        let got = session.add_path(&req, TIMEOUT).await.unwrap();
        assert_eq!(got, id.parse::<Uuid>().unwrap());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/paths/add HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn delete_path_accepts_empty_body() {
        let (session, server) =
            serve(vec![response("200 OK", "")], Duration::ZERO).await;
        let req = DeletePathRequest {
            table_type: TableKind::Global,
            path: path_message(),
        };
        session.delete_path(&req, TIMEOUT).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/paths/delete HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn global_config() {
        let (session, server) = serve(
            vec![response(
                "200 OK",
                r#"{"asn":65001,"router_id":"192.0.2.1"}"#,
            )],
            Duration::ZERO,
        )
        .await;
        let config = session.get_global_config(TIMEOUT).await.unwrap();
        assert_eq!(config.asn, 65001);
        assert_eq!(config.router_id.as_deref(), Some("192.0.2.1"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /v1/global HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn error_status_is_rejected() {
        let (session, _server) = serve(
            vec![response("404 Not Found", "no such peer\n")],
            Duration::ZERO,
        )
        .await;
        let req = AddPathRequest {
            table_type: TableKind::Global,
            path: path_message(),
        };
        let err = session.add_path(&req, TIMEOUT).await.unwrap_err();
        let reason = match err {
            Error::Rejected(reason) => reason,
            other => panic!("expected rejection, got {other:?}"),
        };
        assert_eq!(reason, "404 Not Found: no such peer");
    }

    #[tokio::test]
    async fn stalled_list_times_out() {
        let (session, _server) = serve(
            vec![chunked_head(), chunk(r#"{"prefix":"10.0."#)],
            Duration::from_secs(10),
        )
        .await;
        let mut rx = session
            .list_paths(&list_req(), Duration::from_millis(300))
            .await
            .unwrap();
        let item = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("stream did not give up");
        assert!(matches!(item, Some(Err(Error::Timeout))), "{item:?}");
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let (tx, mut rx) = channel(4);
        assert!(forward_line(b"  \r\n", &tx).await.unwrap());
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn lines_decode_to_destinations() {
        let (tx, mut rx) = channel(4);
        let line = br#"{"prefix":"10.0.0.0/24","paths":[]}"#;
        assert!(forward_line(line, &tx).await.unwrap());
        let dst = rx.recv().await.unwrap().unwrap();
        assert_eq!(dst.prefix, "10.0.0.0/24");
        assert!(dst.paths.is_empty());
    }

    #[tokio::test]
    async fn malformed_line_is_a_response_error() {
        let (tx, _rx) = channel(4);
        let err = forward_line(b"{\"prefix\":", &tx).await.unwrap_err();
        assert!(matches!(err, Error::Response(_)));
    }

    #[tokio::test]
    async fn hung_up_receiver_stops_forwarding() {
        let (tx, rx) = channel(4);
        drop(rx);
        let line = br#"{"prefix":"10.0.0.0/24","paths":[]}"#;
        assert!(!forward_line(line, &tx).await.unwrap());
    }

    #[test]
    fn baseurl_is_normalized() {
        let log = slog::Logger::root(slog::Discard, slog::o!());
        let s = HttpSession::new("http://localhost:50051/", log).unwrap();
        assert_eq!(s.baseurl(), "http://localhost:50051");
    }
}
