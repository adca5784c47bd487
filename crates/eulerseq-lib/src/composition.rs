//! k-mer compositions
//!
//! Decompose a text into the fragments the graph builder consumes: its
//! k-mers, its gapped k-mer pairs, or every k-mer over a finite alphabet.
//! Compositions are returned in lexicographic order so that nothing about the
//! original ordering leaks into reconstruction.

use crate::fragment::{Kmer, ReadPair};

/// All k-mers of `text`, sorted
///
/// Returns an empty list when `k` is zero or longer than the text.
pub fn composition(text: &str, k: usize) -> Vec<Kmer> {
    let symbols: Vec<char> = text.chars().collect();
    if k == 0 || k > symbols.len() {
        return Vec::new();
    }
    let mut kmers: Vec<Kmer> = symbols
        .windows(k)
        .map(|window| Kmer::new(window.iter().collect::<String>()))
        .collect();
    kmers.sort();
    kmers
}

/// All pairs of k-mers starting `k + d` symbols apart in `text`, sorted
pub fn paired_composition(text: &str, k: usize, d: usize) -> Vec<ReadPair> {
    let symbols: Vec<char> = text.chars().collect();
    let span = 2 * k + d;
    if k == 0 || span > symbols.len() {
        return Vec::new();
    }
    let mut pairs: Vec<ReadPair> = (0..=symbols.len() - span)
        .map(|i| {
            let left: String = symbols[i..i + k].iter().collect();
            let right: String = symbols[i + k + d..i + span].iter().collect();
            ReadPair::new(left, right)
        })
        .collect();
    pairs.sort();
    pairs
}

/// Every k-mer over `symbols`, in lexicographic order of the symbol list
///
/// Enumerated with an explicit odometer rather than recursion.
pub fn all_kmers(symbols: &[char], k: usize) -> Vec<Kmer> {
    if symbols.is_empty() {
        return Vec::new();
    }
    let total = symbols.len().pow(k as u32);
    let mut kmers = Vec::with_capacity(total);
    let mut digits = vec![0usize; k];
    for _ in 0..total {
        kmers.push(Kmer::new(digits.iter().map(|&d| symbols[d]).collect::<String>()));
        for position in (0..k).rev() {
            digits[position] += 1;
            if digits[position] < symbols.len() {
                break;
            }
            digits[position] = 0;
        }
    }
    kmers
}
