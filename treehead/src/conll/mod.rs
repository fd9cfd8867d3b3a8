//! Column-based corpora with bracketed parse fragments.
//!
//! Each row of a sentence describes one word. Besides the word and its
//! part-of-speech tag, a row has a fragment of the sentence's bracketed
//! parse tree, in which `*` marks the position of the word, e.g.
//! `(TOP(S(NP*`. Sentences are separated by empty lines, documents are
//! delimited by `#begin` and `#end` lines (CoNLL-2012 style).

use std::cmp;
use std::io::{self, BufRead, Lines, Write};

use itertools::Itertools;
use thiserror::Error;

use crate::dependency::Dependencies;
use crate::tree::{MalformedTreeError, ParseTree};

mod escape;
pub use self::escape::escape_brackets;

/// Relation that is written for unlabeled dependencies.
pub static NO_RELATION: &str = "_";

/// Column reading and writing errors.
#[derive(Debug, Error)]
pub enum ConllError {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A row with fewer fields than the column layout requires.
    #[error("line {line} has {found} fields, at least {required} are required")]
    TooFewColumns {
        line: usize,
        found: usize,
        required: usize,
    },

    /// The number of heads differs from the number of rows.
    #[error("sentence has {rows} rows, but {heads} heads")]
    LengthMismatch { rows: usize, heads: usize },

    /// A sentence row with fewer fields than its column layout requires.
    #[error("row {row} has {found} fields, at least {required} are required")]
    ShortRow {
        row: usize,
        found: usize,
        required: usize,
    },
}

/// Positions of the columns that are used to construct trees.
///
/// Columns are numbered from 0.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ColumnLayout {
    word: usize,
    tag: usize,
    parse: usize,
}

impl ColumnLayout {
    pub fn new(word: usize, tag: usize, parse: usize) -> Self {
        ColumnLayout { word, tag, parse }
    }

    /// The column with the word form.
    pub fn word(&self) -> usize {
        self.word
    }

    /// The column with the part-of-speech tag.
    pub fn tag(&self) -> usize {
        self.tag
    }

    /// The column with the parse fragment.
    pub fn parse(&self) -> usize {
        self.parse
    }

    /// The minimum number of fields of a row.
    pub fn min_fields(&self) -> usize {
        cmp::max(3, self.word.max(self.tag).max(self.parse) + 1)
    }
}

impl Default for ColumnLayout {
    /// The CoNLL-2012 layout: word, tag, and parse in columns 3, 4, and 5.
    fn default() -> Self {
        ColumnLayout::new(3, 4, 5)
    }
}

/// An item of a column file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Block {
    /// A `#begin` or `#end` document line.
    Marker(String),

    /// The rows of a sentence.
    Sentence(ColumnSentence),
}

/// The rows of a single sentence.
///
/// Every row has at least the number of fields that the sentence's
/// column layout requires.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnSentence {
    layout: ColumnLayout,
    rows: Vec<Vec<String>>,
}

impl ColumnSentence {
    /// Construct a sentence from its rows.
    ///
    /// Fails with [`ConllError::ShortRow`] when a row does not have a
    /// field for every column of `layout`. Rows are numbered from 1.
    pub fn new(rows: Vec<Vec<String>>, layout: ColumnLayout) -> Result<Self, ConllError> {
        let required = layout.min_fields();
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() < required)
        {
            return Err(ConllError::ShortRow {
                row: idx + 1,
                found: row.len(),
                required,
            });
        }

        Ok(ColumnSentence { layout, rows })
    }

    /// The column layout of the rows.
    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    /// The fields of every row.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The number of rows (words).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The word forms.
    pub fn words(&self) -> Vec<&str> {
        self.column(self.layout.word())
    }

    /// The part-of-speech tags.
    pub fn tags(&self) -> Vec<&str> {
        self.column(self.layout.tag())
    }

    fn column(&self, idx: usize) -> Vec<&str> {
        self.rows.iter().map(|row| row[idx].as_str()).collect()
    }

    /// Assemble the bracketed tree of the sentence.
    ///
    /// Every `*` in a parse fragment is replaced by `(TAG WORD)`. With
    /// `escape`, brackets in words and tags are replaced by their Penn
    /// Treebank escapes first.
    pub fn tree_description(&self, escape: bool) -> String {
        let layout = self.layout;
        let mut desc = String::new();

        for row in &self.rows {
            let (word, tag) = if escape {
                (
                    escape_brackets(&row[layout.word()]),
                    escape_brackets(&row[layout.tag()]),
                )
            } else {
                (
                    row[layout.word()].as_str().into(),
                    row[layout.tag()].as_str().into(),
                )
            };

            desc.push_str(&row[layout.parse()].replace('*', &format!("({} {})", tag, word)));
        }

        desc
    }

    /// Parse the assembled tree of the sentence.
    pub fn parse_tree(&self, escape: bool) -> Result<ParseTree, MalformedTreeError> {
        self.tree_description(escape).parse()
    }
}

fn is_document_marker(line: &str) -> bool {
    line.starts_with("#begin") || line.starts_with("#end")
}

/// Reader for column files.
///
/// The reader is an iterator over the sentences and document markers of
/// the file. After a row with too few fields, the remaining rows of its
/// sentence are skipped.
pub struct ConllReader<R> {
    lines: Lines<R>,
    layout: ColumnLayout,
    line_no: usize,
    pending_marker: Option<String>,
    skip_sentence: bool,
}

impl<R> ConllReader<R>
where
    R: BufRead,
{
    pub fn new(read: R, layout: ColumnLayout) -> Self {
        ConllReader {
            lines: read.lines(),
            layout,
            line_no: 0,
            pending_marker: None,
            skip_sentence: false,
        }
    }

    /// The column layout of the reader.
    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    fn finish_sentence(
        rows: Vec<Vec<String>>,
        layout: ColumnLayout,
    ) -> Option<Result<Block, ConllError>> {
        if rows.is_empty() {
            None
        } else {
            Some(ColumnSentence::new(rows, layout).map(Block::Sentence))
        }
    }
}

impl<R> Iterator for ConllReader<R>
where
    R: BufRead,
{
    type Item = Result<Block, ConllError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(marker) = self.pending_marker.take() {
            return Some(Ok(Block::Marker(marker)));
        }

        let mut rows = Vec::new();

        for line in &mut self.lines {
            // Bubble up read errors.
            let line = match line {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_no += 1;

            let line = line.trim_end_matches('\r');

            if line.trim().is_empty() {
                self.skip_sentence = false;
                if rows.is_empty() {
                    continue;
                }

                return Self::finish_sentence(rows, self.layout);
            }

            if is_document_marker(line) {
                self.skip_sentence = false;
                if rows.is_empty() {
                    return Some(Ok(Block::Marker(line.to_owned())));
                }

                self.pending_marker = Some(line.to_owned());
                return Self::finish_sentence(rows, self.layout);
            }

            if self.skip_sentence {
                continue;
            }

            let fields: Vec<String> = line
                .split(|ch: char| ch == '\t' || ch == ' ')
                .filter(|field| !field.is_empty())
                .map(ToOwned::to_owned)
                .collect();

            let required = self.layout.min_fields();
            if fields.len() < required {
                self.skip_sentence = true;
                return Some(Err(ConllError::TooFewColumns {
                    line: self.line_no,
                    found: fields.len(),
                    required,
                }));
            }

            rows.push(fields);
        }

        Self::finish_sentence(rows, self.layout)
    }
}

/// Writer for column files with head columns.
///
/// The head and the relation are inserted directly after the parse
/// column of each sentence's layout. Heads are numbered from 1, the root
/// is 0.
pub struct ConllWriter<W> {
    write: W,
}

impl<W> ConllWriter<W>
where
    W: Write,
{
    pub fn new(write: W) -> Self {
        ConllWriter { write }
    }

    /// Write a document marker line.
    pub fn write_marker(&mut self, marker: &str) -> Result<(), ConllError> {
        writeln!(self.write, "{}", marker)?;
        Ok(())
    }

    /// Write a sentence with the given dependencies.
    ///
    /// Without dependencies, `_` is written in the head and relation
    /// columns.
    pub fn write_sentence(
        &mut self,
        sentence: &ColumnSentence,
        dependencies: Option<&Dependencies>,
    ) -> Result<(), ConllError> {
        let heads = match dependencies {
            Some(dependencies) => {
                if dependencies.len() != sentence.len() {
                    return Err(ConllError::LengthMismatch {
                        rows: sentence.len(),
                        heads: dependencies.len(),
                    });
                }

                dependencies
                    .conll_heads()
                    .into_iter()
                    .map(|head| head.to_string())
                    .collect()
            }
            None => vec![NO_RELATION.to_owned(); sentence.len()],
        };

        let split = sentence.layout().parse() + 1;
        for (row, head) in sentence.rows().iter().zip(heads) {
            let line = row[..split]
                .iter()
                .map(String::as_str)
                .chain(vec![head.as_str(), NO_RELATION])
                .chain(row[split..].iter().map(String::as_str))
                .join("\t");
            writeln!(self.write, "{}", line)?;
        }

        writeln!(self.write)?;

        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), ConllError> {
        self.write.flush()?;
        Ok(())
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.write
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{Block, ColumnLayout, ColumnSentence, ConllError, ConllReader, ConllWriter};
    use crate::dependency::DependencyExtractor;
    use crate::head::CollinsHeadFinder;

    static SENTENCE: &str = "doc 0 0 The DT (TOP(S(NP* -
doc 0 1 dog NN *) -
doc 0 2 runs VBZ (VP*) -
doc 0 3 . . *)) -
";

    fn read_all(data: &str) -> Vec<Result<Block, ConllError>> {
        ConllReader::new(Cursor::new(data), ColumnLayout::default()).collect()
    }

    fn read_sentence(data: &str) -> ColumnSentence {
        match read_all(data).remove(0).unwrap() {
            Block::Sentence(sentence) => sentence,
            Block::Marker(marker) => panic!("Unexpected marker: {}", marker),
        }
    }

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|&field| field.to_owned()).collect()
    }

    #[test]
    fn assembles_tree_description() {
        let sentence = read_sentence(SENTENCE);
        assert_eq!(sentence.len(), 4);
        assert_eq!(
            sentence.tree_description(true),
            "(TOP(S(NP(DT The)(NN dog))(VP(VBZ runs))(. .)))"
        );

        let tree = sentence.parse_tree(true).unwrap();
        assert_eq!(
            tree.to_string(),
            "(TOP (S (NP (DT The) (NN dog)) (VP (VBZ runs)) (. .)))"
        );
    }

    #[test]
    fn escapes_brackets_in_words_and_tags() {
        let sentence = read_sentence("d 0 0 ( ( (X*\nd 0 1 x NN *)\n");

        assert_eq!(sentence.tree_description(true), "(X(-LRB- -LRB-)(NN x))");
        assert!(sentence.parse_tree(true).is_ok());
        assert!(sentence.parse_tree(false).is_err());
    }

    #[test]
    fn reads_markers_and_sentences() {
        let data = format!(
            "#begin document (doc); part 000\n{}\n{}#end document\n",
            SENTENCE, SENTENCE
        );
        let blocks: Vec<_> = read_all(&data).into_iter().map(Result::unwrap).collect();

        assert_eq!(blocks.len(), 4);
        assert_eq!(
            blocks[0],
            Block::Marker("#begin document (doc); part 000".to_string())
        );
        assert!(matches!(&blocks[1], Block::Sentence(s) if s.len() == 4));
        assert!(matches!(&blocks[2], Block::Sentence(s) if s.len() == 4));
        assert_eq!(blocks[3], Block::Marker("#end document".to_string()));
    }

    #[test]
    fn splits_on_tabs_and_spaces() {
        let sentence = read_sentence("d\t0  0\tdog \t NN\t(NP*)\n");
        assert_eq!(sentence.rows()[0], vec!["d", "0", "0", "dog", "NN", "(NP*)"]);
    }

    #[test]
    fn reports_short_rows() {
        let data = "d 0 0 The DT (NP*\nd 0 1 dog\nd 0 2 x NN *)\n\nd 0 0 it PRP (NP*)\n";
        let mut blocks = read_all(data).into_iter();

        assert!(matches!(
            blocks.next(),
            Some(Err(ConllError::TooFewColumns {
                line: 2,
                found: 4,
                required: 6
            }))
        ));

        // The rest of the broken sentence is skipped.
        match blocks.next() {
            Some(Ok(Block::Sentence(sentence))) => {
                assert_eq!(sentence.words(), vec!["it"])
            }
            other => panic!("Unexpected block: {:?}", other),
        }
        assert!(blocks.next().is_none());
    }

    #[test]
    fn sentence_rows_must_fit_layout() {
        let rows = vec![
            row(&["d", "0", "0", "The", "DT", "(NP*"]),
            row(&["d", "0", "1", "dog"]),
        ];

        assert!(matches!(
            ColumnSentence::new(rows.clone(), ColumnLayout::default()),
            Err(ConllError::ShortRow {
                row: 2,
                found: 4,
                required: 6
            })
        ));

        let sentence = ColumnSentence::new(rows, ColumnLayout::new(0, 1, 2)).unwrap();
        assert_eq!(sentence.words(), vec!["d", "d"]);
        assert_eq!(sentence.tags(), vec!["0", "0"]);
        assert_eq!(sentence.layout(), ColumnLayout::new(0, 1, 2));
    }

    #[test]
    fn writer_uses_sentence_layout() {
        let layout = ColumnLayout::new(0, 1, 2);
        let sentence = ColumnSentence::new(vec![row(&["it", "PRP", "(NP*)", "x"])], layout).unwrap();
        let mut writer = ConllWriter::new(Vec::new());
        writer.write_sentence(&sentence, None).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(output, "it\tPRP\t(NP*)\t_\t_\tx\n\n");
    }

    #[test]
    fn minimum_field_count() {
        assert_eq!(ColumnLayout::new(0, 1, 2).min_fields(), 3);
        assert_eq!(ColumnLayout::new(0, 1, 1).min_fields(), 3);
        assert_eq!(ColumnLayout::new(7, 1, 2).min_fields(), 8);
    }

    #[test]
    fn writes_head_columns() {
        let sentence = read_sentence(SENTENCE);
        let tree = sentence.parse_tree(true).unwrap();
        let finder = CollinsHeadFinder::mod_collins();
        let deps = DependencyExtractor::new(&finder)
            .extract(sentence.len(), &tree)
            .unwrap();

        let mut writer = ConllWriter::new(Vec::new());
        writer.write_sentence(&sentence, Some(&deps)).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            output,
            "doc\t0\t0\tThe\tDT\t(TOP(S(NP*\t2\t_\t-
doc\t0\t1\tdog\tNN\t*)\t3\t_\t-
doc\t0\t2\truns\tVBZ\t(VP*)\t0\t_\t-
doc\t0\t3\t.\t.\t*))\t3\t_\t-

"
        );
    }

    #[test]
    fn writes_placeholders_without_heads() {
        let sentence = read_sentence("d 0 0 it PRP (NP*)\n");
        let mut writer = ConllWriter::new(Vec::new());
        writer.write_sentence(&sentence, None).unwrap();
        writer.write_marker("#end document").unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(output, "d\t0\t0\tit\tPRP\t(NP*)\t_\t_\n\n#end document\n");
    }
}
