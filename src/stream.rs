//! Streaming batch API: emit file outcomes as they complete.
//!
//! Unlike [`crate::batch::convert_batch`], which returns only after every
//! file is done, [`convert_stream`] yields a [`FileOutcome`] per file as soon
//! as it finishes. With `concurrency > 1` outcomes may arrive out of order
//! (sort by `index` if order matters).
//!
//! Dropping the stream stops further files from being started; files already
//! handed to the blocking pool still run to completion.

use crate::batch::convert_one;
use crate::convert::Engine;
use crate::output::FileOutcome;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-file outcomes.
pub type FileStream = Pin<Box<dyn Stream<Item = FileOutcome> + Send>>;

/// Convert `files` into `out_dir`, streaming outcomes as they are ready.
///
/// File-level progress events fire as in the batch driver;
/// `on_batch_start` / `on_batch_complete` do not, since the stream has no
/// single completion point.
///
/// # Example
/// ```rust,no_run
/// use docshift::{convert_stream, ConversionConfig, Engine};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let engine = Engine::new(ConversionConfig::default());
/// let mut outcomes = convert_stream(&engine, vec!["a.png", "b.pdf"], "out", "WEBP");
/// while let Some(o) = outcomes.next().await {
///     match o.error {
///         None => println!("{}: {} artifact(s)", o.source.display(), o.artifacts),
///         Some(e) => eprintln!("{e}"),
///     }
/// }
/// # }
/// ```
pub fn convert_stream<I, P>(
    engine: &Engine,
    files: I,
    out_dir: impl AsRef<Path>,
    format_name: &str,
) -> FileStream
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let files: Vec<PathBuf> = files.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
    let total = files.len();
    let concurrency = engine.config().concurrency.max(1);
    info!("Starting streaming batch: {} file(s)", total);

    let engine = engine.clone();
    let out_dir = Arc::new(out_dir.as_ref().to_path_buf());
    let format_name: Arc<str> = Arc::from(format_name);

    let s = stream::iter(files.into_iter().enumerate())
        .map(move |(index, source)| {
            convert_one(
                engine.clone(),
                index,
                total,
                source,
                Arc::clone(&out_dir),
                Arc::clone(&format_name),
            )
        })
        .buffer_unordered(concurrency);

    Box::pin(s)
}
