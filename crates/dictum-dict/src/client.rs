use std::time::Duration;

use async_trait::async_trait;
use dictum_session::{DictSession, ProviderError};
use dictum_types::{DatabaseInfo, Definition, MatchResult, StrategyInfo};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;

use crate::reply::{Status, quote, split_words};

const BANNER: u16 = 220;
const OK: u16 = 250;
const BYE: u16 = 221;

const DATABASES_PRESENT: u16 = 110;
const STRATEGIES_PRESENT: u16 = 111;
const DEFINITIONS_RETRIEVED: u16 = 150;
const DEFINITION_FOLLOWS: u16 = 151;
const MATCHES_FOUND: u16 = 152;

const NO_MATCH: u16 = 552;
const NO_DATABASES: u16 = 554;
const NO_STRATEGIES: u16 = 555;

/// One open DICT connection.
pub struct DictConnection<S = TcpStream> {
    stream: BufStream<S>,
    timeout: Option<Duration>,
}

impl<S> DictConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already connected stream and consume the server banner.
    pub async fn handshake(
        stream: S,
        client_name: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut conn = Self {
            stream: BufStream::new(stream),
            timeout,
        };

        let banner = conn.read_status().await?;
        if banner.code != BANNER {
            return Err(banner.into_error());
        }
        tracing::debug!("Server banner: {}", banner.message);

        let status = conn.command(&format!("CLIENT {}", quote(client_name))).await?;
        if status.code != OK {
            tracing::debug!("CLIENT not acknowledged: {} {}", status.code, status.message);
        }

        Ok(conn)
    }

    async fn command(&mut self, line: &str) -> Result<Status, ProviderError> {
        tracing::trace!("> {line}");
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;
        self.read_status().await
    }

    async fn read_line(&mut self) -> Result<String, ProviderError> {
        let mut line = String::new();
        let read = self.stream.read_line(&mut line);
        let n = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, read).await.map_err(|_| {
                ProviderError::Io(std::io::Error::from(std::io::ErrorKind::TimedOut))
            })??,
            None => read.await?,
        };

        if n == 0 {
            return Err(ProviderError::Io(std::io::Error::from(
                std::io::ErrorKind::UnexpectedEof,
            )));
        }

        let line = line.trim_end_matches(['\r', '\n']).to_string();
        tracing::trace!("< {line}");
        Ok(line)
    }

    async fn read_status(&mut self) -> Result<Status, ProviderError> {
        let line = self.read_line().await?;
        Status::parse(&line)
    }

    /// Read a dot-terminated text block.
    async fn read_block(&mut self) -> Result<Vec<String>, ProviderError> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line().await?;
            if line == "." {
                return Ok(lines);
            }
            if line.starts_with("..") {
                lines.push(line[1..].to_string());
            } else {
                lines.push(line);
            }
        }
    }

    async fn expect_ok(&mut self) -> Result<(), ProviderError> {
        let status = self.read_status().await?;
        if status.code != OK {
            return Err(status.into_error());
        }
        Ok(())
    }

    /// Read a `<name> <description>` listing followed by the closing status.
    async fn read_listing(&mut self) -> Result<Vec<(String, String)>, ProviderError> {
        let mut entries = Vec::new();
        for line in self.read_block().await? {
            let mut words = split_words(&line).into_iter();
            let Some(name) = words.next() else {
                continue;
            };
            let description = words.collect::<Vec<_>>().join(" ");
            entries.push((name, description));
        }
        self.expect_ok().await?;
        Ok(entries)
    }
}

#[async_trait]
impl<S> DictSession for DictConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn define(
        &mut self,
        database: &str,
        phrase: &str,
    ) -> Result<Vec<Definition>, ProviderError> {
        let status = self
            .command(&format!("DEFINE {} {}", quote(database), quote(phrase)))
            .await?;
        match status.code {
            DEFINITIONS_RETRIEVED => {}
            NO_MATCH => return Ok(vec![]),
            _ => return Err(status.into_error()),
        }

        let mut definitions = Vec::new();
        loop {
            let status = self.read_status().await?;
            match status.code {
                DEFINITION_FOLLOWS => {
                    let words = split_words(&status.message);
                    let (Some(headword), Some(db)) = (words.first(), words.get(1)) else {
                        return Err(ProviderError::Malformed(format!(
                            "definition header '{}'",
                            status.message
                        )));
                    };
                    let text = self.read_block().await?.join("\n");
                    definitions.push(Definition::from_source(headword.as_str(), db.as_str(), &text));
                }
                OK => break,
                _ => return Err(status.into_error()),
            }
        }

        tracing::debug!("{} definitions for '{phrase}' in {database}", definitions.len());
        Ok(definitions)
    }

    async fn match_words(
        &mut self,
        database: &str,
        strategy: &str,
        phrase: &str,
    ) -> Result<Vec<MatchResult>, ProviderError> {
        let status = self
            .command(&format!(
                "MATCH {} {} {}",
                quote(database),
                quote(strategy),
                quote(phrase)
            ))
            .await?;
        match status.code {
            MATCHES_FOUND => {}
            NO_MATCH => return Ok(vec![]),
            _ => return Err(status.into_error()),
        }

        let mut results: Vec<MatchResult> = Vec::new();
        for (db, headword) in self.read_listing().await? {
            match results.iter_mut().find(|r| r.database == db) {
                Some(result) => result.headwords.push(headword),
                None => results.push(MatchResult {
                    database: db,
                    headwords: vec![headword],
                }),
            }
        }

        Ok(results)
    }

    async fn databases(&mut self) -> Result<Vec<DatabaseInfo>, ProviderError> {
        let status = self.command("SHOW DB").await?;
        match status.code {
            DATABASES_PRESENT => {}
            NO_DATABASES => return Ok(vec![]),
            _ => return Err(status.into_error()),
        }

        Ok(self
            .read_listing()
            .await?
            .into_iter()
            .map(|(identifier, description)| DatabaseInfo {
                identifier,
                description,
            })
            .collect())
    }

    async fn strategies(&mut self) -> Result<Vec<StrategyInfo>, ProviderError> {
        let status = self.command("SHOW STRAT").await?;
        match status.code {
            STRATEGIES_PRESENT => {}
            NO_STRATEGIES => return Ok(vec![]),
            _ => return Err(status.into_error()),
        }

        Ok(self
            .read_listing()
            .await?
            .into_iter()
            .map(|(identifier, description)| StrategyInfo {
                identifier,
                description,
            })
            .collect())
    }

    async fn disconnect(&mut self) -> Result<(), ProviderError> {
        let status = self.command("QUIT").await?;
        if let Err(e) = self.stream.get_mut().shutdown().await {
            tracing::debug!("Socket shutdown after QUIT failed: {e}");
        }
        if status.code != BYE {
            return Err(status.into_error());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, DuplexStream, duplex};

    use super::*;

    /// Play the server side: check each expected command, then send its reply.
    async fn serve(mut server: DuplexStream, script: Vec<(&'static str, &'static str)>) {
        server
            .write_all(b"220 test.server dictd <auth.mime> <1@test>\r\n")
            .await
            .unwrap();

        for (expected, reply) in script {
            let mut line = Vec::new();
            loop {
                let mut byte = [0u8; 1];
                server.read_exact(&mut byte).await.unwrap();
                if byte[0] == b'\n' {
                    break;
                }
                line.push(byte[0]);
            }
            let line = String::from_utf8(line).unwrap();
            assert_eq!(line.trim_end(), expected);
            server.write_all(reply.as_bytes()).await.unwrap();
        }
    }

    async fn connect(
        script: Vec<(&'static str, &'static str)>,
    ) -> (DictConnection<DuplexStream>, tokio::task::JoinHandle<()>) {
        let (client, server) = duplex(8192);
        let mut full = vec![("CLIENT dictum", "250 ok\r\n")];
        full.extend(script);
        let handle = tokio::spawn(serve(server, full));
        let conn = DictConnection::handshake(client, "dictum", Some(Duration::from_secs(5)))
            .await
            .unwrap();
        (conn, handle)
    }

    #[tokio::test]
    async fn test_define() {
        let (mut conn, server) = connect(vec![(
            "DEFINE * apple",
            "150 2 definitions retrieved\r\n\
             151 \"apple\" wn \"WordNet (r) 3.0\"\r\n\
             apple\r\n\
             \x20   n 1: fruit with red or yellow or green skin\r\n\
             \x20        and sweet to tart crisp whitish flesh\r\n\
             .\r\n\
             151 \"Apple\" gcide \"Collaborative International Dictionary\"\r\n\
             Apple \\Ap\"ple\\, n.\r\n\
             ..The fleshy pome of a tree.\r\n\
             .\r\n\
             250 ok\r\n",
        )])
        .await;

        let defs = conn.define("*", "apple").await.unwrap();
        server.await.unwrap();

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].database, "wn");
        assert_eq!(
            defs[0].body,
            "n 1: fruit with red or yellow or green skin and sweet to tart crisp whitish flesh"
        );
        assert_eq!(defs[1].headword, "Apple");
        assert_eq!(defs[1].database, "gcide");
        assert_eq!(defs[1].body, ".The fleshy pome of a tree.");
    }

    #[tokio::test]
    async fn test_define_no_match_is_empty() {
        let (mut conn, server) =
            connect(vec![("DEFINE wn \"zz qq\"", "552 no match\r\n")]).await;

        let defs = conn.define("wn", "zz qq").await.unwrap();
        server.await.unwrap();
        assert!(defs.is_empty());
    }

    #[tokio::test]
    async fn test_define_invalid_database() {
        let (mut conn, server) =
            connect(vec![("DEFINE nope apple", "550 invalid database\r\n")]).await;

        let err = conn.define("nope", "apple").await.unwrap_err();
        server.await.unwrap();
        assert!(matches!(err, ProviderError::Protocol { code: 550, .. }));
    }

    #[tokio::test]
    async fn test_match_groups_by_database() {
        let (mut conn, server) = connect(vec![(
            "MATCH * prefix app",
            "152 3 matches found\r\n\
             wn \"apple\"\r\n\
             gcide \"Apple\"\r\n\
             wn \"applejack\"\r\n\
             .\r\n\
             250 ok\r\n",
        )])
        .await;

        let results = conn.match_words("*", "prefix", "app").await.unwrap();
        server.await.unwrap();

        assert_eq!(
            results,
            vec![
                MatchResult {
                    database: "wn".to_string(),
                    headwords: vec!["apple".to_string(), "applejack".to_string()],
                },
                MatchResult {
                    database: "gcide".to_string(),
                    headwords: vec!["Apple".to_string()],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_show_db_and_strat() {
        let (mut conn, server) = connect(vec![
            (
                "SHOW DB",
                "110 2 databases present\r\n\
                 wn \"WordNet (r) 3.0 (2006)\"\r\n\
                 foldoc \"The Free On-line Dictionary of Computing\"\r\n\
                 .\r\n\
                 250 ok\r\n",
            ),
            ("SHOW STRAT", "555 no strategies available\r\n"),
            ("QUIT", "221 bye\r\n"),
        ])
        .await;

        let dbs = conn.databases().await.unwrap();
        assert_eq!(dbs.len(), 2);
        assert_eq!(dbs[0].identifier, "wn");
        assert_eq!(dbs[0].description, "WordNet (r) 3.0 (2006)");

        assert!(conn.strategies().await.unwrap().is_empty());
        conn.disconnect().await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_bad_banner() {
        let (client, mut server) = duplex(1024);
        server
            .write_all(b"530 access denied\r\n")
            .await
            .unwrap();

        let err = DictConnection::handshake(client, "dictum", None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ProviderError::Protocol { code: 530, .. }));
    }

    #[tokio::test]
    async fn test_closed_connection() {
        let (client, server) = duplex(1024);
        drop(server);

        let err = DictConnection::handshake(client, "dictum", None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ProviderError::Io(_)));
    }
}
