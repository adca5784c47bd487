//! Dataset readers
//!
//! Plain-text formats:
//! - k-mer list: optional first line holding k, then one k-mer per line
//! - read pairs: first line `k d`, then one `LEFT|RIGHT` pair per line
//! - adjacency list: `node -> a,b,c` per line
//!
//! Reads can also come from FASTA/FASTQ files (gzip handled by needletail),
//! one fragment per record. Blank lines are skipped everywhere.

use crate::constants::TRAIL_SEPARATOR;
use crate::fragment::{Kmer, ReadPair};
use crate::graph::Graph;
use anyhow::{anyhow, bail, Context, Result};
use needletail::parse_fastx_file;
use std::fs;
use std::path::Path;

/// Contents of a k-mer list file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerList {
    /// k from the header line, if the file has one
    pub k: Option<usize>,
    /// The k-mers, in file order
    pub kmers: Vec<Kmer>,
}

/// Contents of a read-pair file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairList {
    /// Length of each half
    pub k: usize,
    /// Gap between the halves
    pub d: usize,
    /// The pairs, in file order
    pub pairs: Vec<ReadPair>,
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Parse a k-mer list file
pub fn parse_kmer_list<P: AsRef<Path>>(path: P) -> Result<KmerList> {
    let path = path.as_ref();
    let text = read_text(path)?;
    parse_kmer_list_str(&text).with_context(|| format!("Invalid k-mer list {}", path.display()))
}

/// Parse the text of a k-mer list
///
/// A leading all-digit line is read as k only when another line follows it
/// with a different length. Otherwise it is a binary k-mer, so a lone `10`
/// is one k-mer rather than an empty list with k = 10.
pub fn parse_kmer_list_str(text: &str) -> Result<KmerList> {
    let lines: Vec<(usize, &str)> = content_lines(text).collect();
    let header = match lines.as_slice() {
        [(line_no, first), rest @ ..]
            if first.chars().all(|c| c.is_ascii_digit())
                && rest.first().is_some_and(|(_, next)| next.len() != first.len()) =>
        {
            let k = first
                .parse::<usize>()
                .with_context(|| format!("line {line_no}: invalid k {first:?}"))?;
            Some(k)
        }
        _ => None,
    };
    let skip = usize::from(header.is_some());
    let kmers = lines[skip..].iter().map(|&(_, line)| Kmer::new(line)).collect();
    Ok(KmerList { k: header, kmers })
}

/// Parse a read-pair file
pub fn parse_read_pairs<P: AsRef<Path>>(path: P) -> Result<PairList> {
    let path = path.as_ref();
    let text = read_text(path)?;
    parse_read_pairs_str(&text).with_context(|| format!("Invalid read-pair file {}", path.display()))
}

/// Parse the text of a read-pair file
pub fn parse_read_pairs_str(text: &str) -> Result<PairList> {
    let mut lines = content_lines(text);
    let (line_no, header) = lines.next().ok_or_else(|| anyhow!("missing `k d` header"))?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    let [k, d] = fields.as_slice() else {
        bail!("line {line_no}: expected `k d`, got {header:?}");
    };
    let k = k
        .parse::<usize>()
        .with_context(|| format!("line {line_no}: invalid k {k:?}"))?;
    let d = d
        .parse::<usize>()
        .with_context(|| format!("line {line_no}: invalid d {d:?}"))?;

    let pairs = lines
        .map(|(line_no, line)| {
            line.parse::<ReadPair>()
                .with_context(|| format!("line {line_no}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(PairList { k, d, pairs })
}

/// Parse an adjacency-list file into a graph with unlabelled edges
pub fn parse_adjacency_list<P: AsRef<Path>>(path: P) -> Result<Graph<String, ()>> {
    let path = path.as_ref();
    let text = read_text(path)?;
    parse_adjacency_list_str(&text)
        .with_context(|| format!("Invalid adjacency list {}", path.display()))
}

/// Parse the text of an adjacency list
///
/// Edges are added in file order, targets left to right.
pub fn parse_adjacency_list_str(text: &str) -> Result<Graph<String, ()>> {
    let mut graph = Graph::new();
    for (line_no, line) in content_lines(text) {
        let (source, targets) = line
            .split_once(TRAIL_SEPARATOR)
            .ok_or_else(|| anyhow!("line {line_no}: expected `node -> a,b`, got {line:?}"))?;
        let source = source.trim();
        if source.is_empty() {
            bail!("line {line_no}: missing source node");
        }
        for target in targets.split(',').map(str::trim) {
            if target.is_empty() {
                bail!("line {line_no}: empty target in {line:?}");
            }
            graph.add_edge(source.to_string(), target.to_string(), ());
        }
    }
    Ok(graph)
}

/// Parse a FASTA/FASTQ file and call a function for each valid DNA sequence
///
/// # Arguments
/// * `path` - Path to input file (may be gzipped)
/// * `callback` - Function called for each sequence, receives (name, sequence)
///
/// # Errors
/// Returns error if:
/// - File cannot be opened
/// - File format is invalid
/// - Sequence contains non-DNA characters
pub fn parse_sequences<P, F>(path: P, mut callback: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(&[u8], &[u8]) -> Result<()>,
{
    let path = path.as_ref();
    let mut reader = parse_fastx_file(path)
        .with_context(|| format!("Failed to open sequence file: {}", path.display()))?;

    while let Some(record) = reader.next() {
        let record = record
            .with_context(|| format!("Failed to parse sequence record in {}", path.display()))?;
        let seq = record.seq();
        validate_dna_sequence(&seq)
            .with_context(|| format!("Invalid DNA sequence in {}", path.display()))?;
        callback(record.id(), &seq)?;
    }

    Ok(())
}

/// Load every record of a FASTA/FASTQ file as one upper-case fragment
pub fn parse_reads<P: AsRef<Path>>(path: P) -> Result<Vec<Kmer>> {
    let mut reads = Vec::new();
    parse_sequences(path, |_name, seq| {
        reads.push(Kmer::new(String::from_utf8_lossy(seq).to_ascii_uppercase()));
        Ok(())
    })?;
    Ok(reads)
}

/// Whether a path names a FASTA/FASTQ file, judging by its extension
pub fn is_fastx_path<P: AsRef<Path>>(path: P) -> bool {
    let name = path.as_ref().to_string_lossy().to_ascii_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    [".fa", ".fasta", ".fna", ".fq", ".fastq"]
        .iter()
        .any(|ext| name.ends_with(ext))
}

/// Validate that a sequence contains only valid DNA bases (A, C, G, T)
///
/// # Errors
/// Returns error if sequence contains non-ACGT characters
pub fn validate_dna_sequence(seq: &[u8]) -> Result<()> {
    for (i, &base) in seq.iter().enumerate() {
        match base {
            b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't' => {}
            _ => bail!(
                "Invalid DNA base '{}' at position {}. Only A, C, G, T are allowed.",
                base as char,
                i
            ),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(contents: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{contents}")?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_validate_dna_sequence() {
        assert!(validate_dna_sequence(b"ACGTacgt").is_ok());
        assert!(validate_dna_sequence(b"ACGTN").is_err());
        assert!(validate_dna_sequence(b"ACG-T").is_err());
    }

    #[test]
    fn test_kmer_list_with_header() -> Result<()> {
        let file = temp_with("3\nATG\nTGG\n\nGGC\nGCA\n")?;
        let list = parse_kmer_list(file.path())?;
        assert_eq!(list.k, Some(3));
        let tokens: Vec<&str> = list.kmers.iter().map(Kmer::as_str).collect();
        assert_eq!(tokens, vec!["ATG", "TGG", "GGC", "GCA"]);
        Ok(())
    }

    #[test]
    fn test_kmer_list_without_header() -> Result<()> {
        let list = parse_kmer_list_str("  ATG \nTGG\n")?;
        assert_eq!(list.k, None);
        assert_eq!(list.kmers, vec![Kmer::new("ATG"), Kmer::new("TGG")]);
        let binary = parse_kmer_list_str("01\n10\n")?;
        assert_eq!((binary.k, binary.kmers.len()), (None, 2));
        let headed = parse_kmer_list_str("2\n01\n10\n")?;
        assert_eq!((headed.k, headed.kmers.len()), (Some(2), 2));
        let lone = parse_kmer_list_str("10\n")?;
        assert_eq!(lone.k, None);
        assert_eq!(lone.kmers, vec![Kmer::new("10")]);
        Ok(())
    }

    #[test]
    fn test_read_pairs() -> Result<()> {
        let file = temp_with("3 1\nTAA|GCC\nAAT|CCA\n")?;
        let list = parse_read_pairs(file.path())?;
        assert_eq!((list.k, list.d), (3, 1));
        assert_eq!(list.pairs, vec![ReadPair::new("TAA", "GCC"), ReadPair::new("AAT", "CCA")]);
        Ok(())
    }

    #[test]
    fn test_read_pairs_errors() {
        assert!(parse_read_pairs_str("").is_err());
        assert!(parse_read_pairs_str("3\nTAA|GCC\n").is_err());
        let err = parse_read_pairs_str("3 1\nTAA|GCC\nAATCCA\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));
    }

    #[test]
    fn test_adjacency_list() -> Result<()> {
        let file = temp_with("0 -> 3\n1 -> 0\n2 -> 1,6\n")?;
        let graph = parse_adjacency_list(file.path())?;
        assert_eq!(graph.num_edges(), 4);
        let nodes: Vec<&str> = graph.nodes().map(|(_, n)| n.as_str()).collect();
        assert_eq!(nodes, vec!["0", "3", "1", "2", "6"]);
        assert_eq!(graph.out_degree(3), 2);
        Ok(())
    }

    #[test]
    fn test_adjacency_list_errors() {
        assert!(parse_adjacency_list_str("0 3\n").is_err());
        assert!(parse_adjacency_list_str(" -> 3\n").is_err());
        assert!(parse_adjacency_list_str("0 -> 3,\n").is_err());
    }

    #[test]
    fn test_parse_fasta_reads() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".fa").tempfile()?;
        writeln!(file, ">r1\natg\n>r2\nTGG")?;
        file.flush()?;

        assert!(is_fastx_path(file.path()));
        let reads = parse_reads(file.path())?;
        assert_eq!(reads, vec![Kmer::new("ATG"), Kmer::new("TGG")]);
        Ok(())
    }

    #[test]
    fn test_fastx_detection() {
        assert!(is_fastx_path("reads.fastq.gz"));
        assert!(is_fastx_path("READS.FA"));
        assert!(!is_fastx_path("kmers.txt"));
    }

    #[test]
    fn test_missing_file() {
        assert!(parse_kmer_list("/nonexistent/kmers.txt").is_err());
    }
}
