use std::io::BufRead;

use crate::error::{Error, Result};

/// Upper bound on line slots reserved up front for a new chunk. Large
/// `chunk_lines` settings grow past this on demand.
const MAX_PREALLOC_LINES: usize = 1 << 16;

/// An ordered batch of raw input lines, stored back to back in one buffer.
///
/// Line terminators are already stripped. A chunk is moved, never shared, so
/// whoever holds it has it to themselves.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Chunk {
    data: Vec<u8>,
    ends: Vec<usize>,
}

impl Chunk {
    fn with_capacity(lines: usize, bytes: usize) -> Self {
        Chunk {
            data: Vec::with_capacity(bytes),
            ends: Vec::with_capacity(lines.min(MAX_PREALLOC_LINES)),
        }
    }

    /// Builds a chunk from already split lines.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut chunk = Chunk::default();
        for line in lines {
            chunk.data.extend_from_slice(line.as_ref());
            chunk.ends.push(chunk.data.len());
        }
        chunk
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Lines in input order, without terminators.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.ends.iter().scan(0, move |start, &end| {
            let line = &self.data[*start..end];
            *start = end;
            Some(line)
        })
    }
}

/// Reads an input stream sequentially and groups its lines into chunks of
/// `chunk_lines` lines each; the last chunk may be shorter.
///
/// Yields `Err` at most once, after which the source is exhausted.
pub struct ChunkSource<R> {
    reader: R,
    chunk_lines: usize,
    bytes_hint: usize,
    done: bool,
}

impl<R: BufRead> ChunkSource<R> {
    /// `chunk_lines` must be non-zero; a zero is treated as one.
    pub fn new(reader: R, chunk_lines: usize) -> Self {
        ChunkSource {
            reader,
            chunk_lines: chunk_lines.max(1),
            bytes_hint: 0,
            done: false,
        }
    }

    // Appends the next line to `chunk`. Returns false at end of input.
    fn read_line(&mut self, chunk: &mut Chunk) -> std::io::Result<bool> {
        let start = chunk.data.len();
        if self.reader.read_until(b'\n', &mut chunk.data)? == 0 {
            return Ok(false);
        }
        if chunk.data.last() == Some(&b'\n') {
            chunk.data.pop();
            if chunk.data.len() > start && chunk.data.last() == Some(&b'\r') {
                chunk.data.pop();
            }
        }
        chunk.ends.push(chunk.data.len());
        Ok(true)
    }
}

impl<R: BufRead> Iterator for ChunkSource<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut chunk = Chunk::with_capacity(self.chunk_lines, self.bytes_hint);
        while chunk.len() < self.chunk_lines {
            match self.read_line(&mut chunk) {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    break;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(Error::Read(e)));
                }
            }
        }

        if chunk.is_empty() {
            return None;
        }
        self.bytes_hint = chunk.data.len();
        Some(Ok(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    fn collect(input: &str, chunk_lines: usize) -> Vec<Vec<String>> {
        ChunkSource::new(Cursor::new(input.as_bytes()), chunk_lines)
            .map(|chunk| {
                chunk
                    .unwrap()
                    .lines()
                    .map(|l| String::from_utf8(l.to_vec()).unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn groups_lines_into_fixed_size_chunks() {
        let chunks = collect("a;1\nb;2\nc;3\nd;4\ne;5\n", 2);
        assert_eq!(
            chunks,
            vec![
                vec!["a;1", "b;2"],
                vec!["c;3", "d;4"],
                vec!["e;5"],
            ]
        );
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let chunks = collect("a;1\nb;2\n", 2);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn final_line_without_newline_is_kept() {
        let chunks = collect("a;1\nb;2", 10);
        assert_eq!(chunks, vec![vec!["a;1", "b;2"]]);
    }

    #[test]
    fn strips_carriage_returns() {
        let chunks = collect("a;1\r\nb;2\r\n", 10);
        assert_eq!(chunks, vec![vec!["a;1", "b;2"]]);
    }

    #[test]
    fn blank_lines_are_still_lines() {
        let chunks = collect("\n\na;1\n", 10);
        assert_eq!(chunks, vec![vec!["", "", "a;1"]]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(collect("", 3).is_empty());
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let chunks = collect("a;1\nb;2\n", 0);
        assert_eq!(chunks.len(), 2);
    }

    struct FailAfter {
        inner: Cursor<Vec<u8>>,
        fail: bool,
    }

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.inner.read(buf)?;
            if n == 0 && self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            Ok(n)
        }
    }

    #[test]
    fn read_error_is_yielded_once() {
        let reader = io::BufReader::new(FailAfter {
            inner: Cursor::new(b"a;1\nb;2".to_vec()),
            fail: true,
        });
        let mut source = ChunkSource::new(reader, 10);
        assert!(matches!(source.next(), Some(Err(Error::Read(_)))));
        assert!(source.next().is_none());
    }

    #[test]
    fn from_lines_round_trips() {
        let chunk = Chunk::from_lines(["x;1", "", "y;2"]);
        assert_eq!(chunk.len(), 3);
        let lines: Vec<&[u8]> = chunk.lines().collect();
        assert_eq!(lines, vec![&b"x;1"[..], &b""[..], &b"y;2"[..]]);
    }
}
