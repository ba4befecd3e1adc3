//! Canned reply selection
//!
//! Replies are picked uniformly at random from small fixed sets. The source of
//! randomness is injectable so tests can pin the choice.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Chooses an index into a list of reply variants
pub trait ReplyPicker: Send + Sync {
    /// Return an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform random picker backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl ReplyPicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same position (clamped to the list length)
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl ReplyPicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

/// Cycles through positions 0, 1, 2, ... wrapping at each list's length
#[derive(Debug, Default)]
pub struct CyclingPicker {
    next: AtomicUsize,
}

impl ReplyPicker for CyclingPicker {
    fn pick(&self, len: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % len
    }
}

/// Pick one reply from `variants`
///
/// An out-of-range pick falls back to the last variant.
pub fn choose<'a>(picker: &dyn ReplyPicker, variants: &[&'a str]) -> &'a str {
    if variants.is_empty() {
        return "";
    }
    variants
        .get(picker.pick(variants.len()))
        .or(variants.last())
        .copied()
        .unwrap_or_default()
}

/// Shown when the input does not look like a transaction
pub const NOT_UNDERSTOOD_REPLIES: &[&str] = &[
    "Hmm, aku kurang nangkep maksudnya nih. Bisa lebih spesifik gak? Misalnya: 'bayar makan 50rb' atau 'terima gaji 5jt' 🤔",
    "Waduh, aku gak terlalu paham yang kamu maksud. Coba kasih info yang lebih jelas yuk, contoh: 'kemarin beli pulsa 25 ribu' 😅",
    "Maaf ya, aku masih bingung sama maksudnya. Bisa dijelasin lagi dengan lebih detail? Kayak 'tadi isi bensin 100rb' gitu 💭",
    "Agak susah nih aku ngerti. Tolong kasih tau dengan format yang lebih jelas dong, misal: '2 hari lalu bayar netflix 50rb' 🙏",
    "Sorry, aku gak mudeng deh sama input ini. Coba pake kalimat yang lebih spesifik ya, contoh: 'belanja groceries 200 ribu' 😊",
];

/// User-visible message when single-transaction extraction fails
pub const EXTRACTION_FAILED: &str =
    "Failed to parse transaction. Please try rephrasing or use the manual form.";

/// User-visible message when multi-transaction extraction fails
pub const MULTI_EXTRACTION_FAILED: &str =
    "Failed to parse multiple transactions. Please try rephrasing or use the manual form.";
