//! Spelling sequences from ordered fragments
//!
//! Consecutive fragments overlap in all but one symbol, so a path spells the
//! first symbol of every fragment followed by the tail of the last one. Paired
//! paths are spelled per half, and the halves must agree on the region they
//! both cover, offset by k + d.

use crate::fragment::PairedSymbols;
use thiserror::Error;

/// Error raised when the halves of a paired path cannot be reconciled
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InconsistentPairingError {
    /// The halves disagree inside their shared region
    #[error("paired halves disagree: right[{offset}] = {right:?} but left[{offset}+{shift}] = {left:?}")]
    Mismatch {
        /// Position in the right-half spelling
        offset: usize,
        /// k + d
        shift: usize,
        /// Symbol in the left-half spelling at `offset + shift`
        left: char,
        /// Symbol in the right-half spelling at `offset`
        right: char,
    },
    /// The halves spell strings of different lengths
    #[error("paired halves spell {left} and {right} symbols")]
    LengthMismatch {
        /// Length of the left-half spelling
        left: usize,
        /// Length of the right-half spelling
        right: usize,
    },
    /// The pair windows leave a stretch of the sequence unobserved
    #[error("right half spells {spelled} symbols but k + d = {shift}; the gap is not covered")]
    Uncovered {
        /// Length of the right-half spelling
        spelled: usize,
        /// k + d
        shift: usize,
    },
}

/// Spell a path of overlapping fragments
///
/// Each fragment must overlap the next in all but its first symbol; this is
/// not rechecked. Works on trail nodes (k-1 symbols) and on k-mer labels
/// alike. An empty path spells an empty string.
pub fn reconstruct_single<S: AsRef<str>>(fragments: &[S]) -> String {
    let Some((last, head)) = fragments.split_last() else {
        return String::new();
    };
    let mut sequence = String::with_capacity(head.len() + last.as_ref().len());
    for fragment in head {
        if let Some(symbol) = fragment.as_ref().chars().next() {
            sequence.push(symbol);
        }
    }
    sequence.push_str(last.as_ref());
    sequence
}

/// Spell a closed path as a circular string
///
/// Takes the first symbol of every fragment, so a cycle of E edges spells a
/// circular string of length E with no repeated wrap-around tail.
pub fn reconstruct_cyclic<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .filter_map(|fragment| fragment.as_ref().chars().next())
        .collect()
}

/// Spell a path of read pairs (or pair nodes) separated by gap `d`
///
/// # Errors
/// Returns an `InconsistentPairingError` if the left and right spellings
/// differ in length, leave the gap uncovered, or disagree at any position of
/// their shared region
pub fn reconstruct_paired<P: PairedSymbols>(
    pairs: &[P],
    k: usize,
    d: usize,
) -> Result<String, InconsistentPairingError> {
    let lefts: Vec<&str> = pairs.iter().map(|p| p.left()).collect();
    let rights: Vec<&str> = pairs.iter().map(|p| p.right()).collect();
    let prefix: Vec<char> = reconstruct_single(&lefts).chars().collect();
    let suffix: Vec<char> = reconstruct_single(&rights).chars().collect();

    if prefix.len() != suffix.len() {
        return Err(InconsistentPairingError::LengthMismatch {
            left: prefix.len(),
            right: suffix.len(),
        });
    }
    let shift = k + d;
    if suffix.len() < shift {
        return Err(InconsistentPairingError::Uncovered {
            spelled: suffix.len(),
            shift,
        });
    }

    for offset in 0..prefix.len() - shift {
        if prefix[offset + shift] != suffix[offset] {
            return Err(InconsistentPairingError::Mismatch {
                offset,
                shift,
                left: prefix[offset + shift],
                right: suffix[offset],
            });
        }
    }

    let mut sequence: String = prefix.into_iter().collect();
    sequence.extend(&suffix[suffix.len() - shift..]);
    Ok(sequence)
}

/// Length of the sequence a path of `n` fragments of length `k` spells
#[inline]
pub fn spelled_len(n: usize, k: usize) -> usize {
    if n == 0 {
        0
    } else {
        n + k - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{PairNode, ReadPair};

    #[test]
    fn test_reconstruct_single_kmers() {
        assert_eq!(reconstruct_single(&["ATG", "TGG", "GGC", "GCA"]), "ATGGCA");
    }

    #[test]
    fn test_reconstruct_single_nodes() {
        assert_eq!(reconstruct_single(&["AT", "TG", "GG", "GC", "CA"]), "ATGGCA");
        let owned = ["AT".to_string(), "TG".to_string()];
        let refs: Vec<&String> = owned.iter().collect();
        assert_eq!(reconstruct_single(&refs), "ATG");
    }

    #[test]
    fn test_reconstruct_single_edge_cases() {
        assert_eq!(reconstruct_single::<&str>(&[]), "");
        assert_eq!(reconstruct_single(&["ACGT"]), "ACGT");
        assert_eq!(spelled_len(0, 3), 0);
        assert_eq!(spelled_len(4, 3), 6);
    }

    #[test]
    fn test_reconstruct_cyclic() {
        assert_eq!(reconstruct_cyclic(&["00", "01", "11", "10"]), "0011");
        assert_eq!(reconstruct_cyclic::<&str>(&[]), "");
    }

    #[test]
    fn test_reconstruct_paired_consistent() {
        // TAATGCCATGGGATGTT with k = 3, d = 1
        let pairs: Vec<ReadPair> = [
            "TAA|GCC", "AAT|CCA", "ATG|CAT", "TGC|ATG", "GCC|TGG", "CCA|GGG", "CAT|GGA",
            "ATG|GAT", "TGG|ATG", "GGG|TGT", "GGA|GTT",
        ]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();

        assert_eq!(reconstruct_paired(&pairs, 3, 1).unwrap(), "TAATGCCATGGGATGTT");
    }

    #[test]
    fn test_reconstruct_paired_from_nodes() {
        let nodes = vec![
            PairNode::new("TA", "GC"),
            PairNode::new("AA", "CC"),
            PairNode::new("AT", "CA"),
            PairNode::new("TG", "AT"),
        ];
        // left spells TAATG, right spells GCCAT; k + d = 5 leaves no overlap
        assert_eq!(reconstruct_paired(&nodes, 3, 2).unwrap(), "TAATGGCCAT");
    }

    #[test]
    fn test_reconstruct_paired_mismatch() {
        let pairs = vec![
            ReadPair::new("AAT", "GCC"),
            ReadPair::new("ATG", "CCA"),
            ReadPair::new("TGC", "CAT"),
            ReadPair::new("GCC", "ATT"),
        ];
        // left AATGCC, right GCCATT, shift 2: left[2] = T vs right[0] = G
        let err = reconstruct_paired(&pairs, 1, 1).unwrap_err();
        assert_eq!(
            err,
            InconsistentPairingError::Mismatch { offset: 0, shift: 2, left: 'T', right: 'G' }
        );
    }

    #[test]
    fn test_reconstruct_paired_uncovered_gap() {
        let pairs = vec![ReadPair::new("AC", "GT")];
        assert_eq!(
            reconstruct_paired(&pairs, 2, 3),
            Err(InconsistentPairingError::Uncovered { spelled: 2, shift: 5 })
        );
    }

    #[test]
    fn test_reconstruct_paired_length_mismatch() {
        let pairs = vec![ReadPair::new("ACG", "GT")];
        assert_eq!(
            reconstruct_paired(&pairs, 3, 0),
            Err(InconsistentPairingError::LengthMismatch { left: 3, right: 2 })
        );
    }
}
