use std::io::{self, Read, Seek, SeekFrom};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

pub struct ReadProgress<R> {
    inner: R,
    progress_bar: ProgressBar,
}

/// A progress bar that implements the `Read` and `Seek` traits.
///
/// This wrapper of `indicatif`'s `ProgressBar` updates progress based on the
/// current offset within the file.
impl<R> ReadProgress<R>
where
    R: Seek,
{
    pub fn new(mut read: R) -> io::Result<Self> {
        let len = read.seek(SeekFrom::End(0))? + 1;
        read.seek(SeekFrom::Start(0))?;
        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{bar} {bytes}/{total_bytes} {msg}")
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
        progress_bar.set_style(style);

        Ok(ReadProgress {
            inner: read,
            progress_bar,
        })
    }
}

impl<R> Read for ReadProgress<R>
where
    R: Read + Seek,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n_read = self.inner.read(buf)?;
        let pos = self.inner.stream_position()?;
        self.progress_bar.set_position(pos);
        Ok(n_read)
    }
}

impl<R> Seek for ReadProgress<R>
where
    R: Seek,
{
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let pos = self.inner.seek(pos)?;
        self.progress_bar.set_position(pos);
        Ok(pos)
    }
}

impl<R> Drop for ReadProgress<R> {
    fn drop(&mut self) {
        self.progress_bar.finish();
    }
}

/// Conversion statistics.
///
/// An instance takes the current time when it is constructed. Every
/// sentence should be counted with either `count_sentence` or
/// `count_malformed`. The statistics are logged when the instance is
/// dropped.
pub struct ConversionStats {
    start: Instant,
    n_sentences: usize,
    n_malformed: usize,
}

impl ConversionStats {
    /// Construct a new instance.
    pub fn new() -> Self {
        ConversionStats {
            start: Instant::now(),
            n_sentences: 0,
            n_malformed: 0,
        }
    }

    /// Count a converted sentence.
    pub fn count_sentence(&mut self) {
        self.n_sentences += 1;
    }

    /// Count a sentence with a malformed tree.
    pub fn count_malformed(&mut self) {
        self.n_malformed += 1;
    }
}

impl Default for ConversionStats {
    fn default() -> Self {
        ConversionStats::new()
    }
}

impl Drop for ConversionStats {
    fn drop(&mut self) {
        let elapsed_secs = self.start.elapsed().as_secs_f32();
        log::info!(
            "Converted {} sentences in {:.1}s ({:.1} sents/s), skipped {} malformed",
            self.n_sentences,
            elapsed_secs,
            self.n_sentences as f32 / elapsed_secs,
            self.n_malformed
        );
    }
}
