//! One-shot execution: open the connection, run exactly one query, print
//! the rows as JSON, close, exit.

use crate::config::Config;
use crate::core::db::{self, Db};
use crate::core::Result;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Runs the one-shot mode. The connection is released on every exit path,
/// success or failure, before the result is returned.
pub async fn run_once(config: &Config) -> Result<()> {
    let db = Db::connect(config).await?;
    let outcome = query_and_print(&db, config).await;
    db.close().await;
    outcome
}

async fn query_and_print(db: &Db, config: &Config) -> Result<()> {
    let query = resolve_query(config.query.as_deref(), tokio::io::stdin()).await?;
    let rows = db::execute(db.client(), &query, &config.params).await?;
    println!("{}", db::render(&rows)?);
    Ok(())
}

/// Determines the query text: a positional argument other than the `-`
/// sentinel is used verbatim and `input` is never touched; otherwise the
/// whole input stream is read to end-of-stream and used as the query.
pub async fn resolve_query<R>(positional: Option<&str>, mut input: R) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    if let Some(query) = positional {
        if query != "-" {
            return Ok(query.to_string());
        }
    }

    let mut text = String::new();
    input.read_to_string(&mut text).await?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Reader that fails the test if the one-shot path ever consumes it.
    struct MustNotRead;

    impl AsyncRead for MustNotRead {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            panic!("stdin must not be consumed when a query argument is given");
        }
    }

    #[tokio::test]
    async fn test_positional_query_used_verbatim() {
        let query = resolve_query(Some("select * from t"), MustNotRead).await.unwrap();
        assert_eq!(query, "select * from t");
    }

    #[tokio::test]
    async fn test_dash_reads_input_to_end() {
        let input: &[u8] = b"select 1;\nselect 2;\n";
        let query = resolve_query(Some("-"), input).await.unwrap();
        assert_eq!(query, "select 1;\nselect 2;\n");
    }

    #[tokio::test]
    async fn test_missing_argument_reads_input_to_end() {
        let input: &[u8] = b"select now()";
        let query = resolve_query(None, input).await.unwrap();
        assert_eq!(query, "select now()");
    }
}
