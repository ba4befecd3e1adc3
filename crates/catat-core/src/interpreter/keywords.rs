//! Keyword lists and the typo-tolerant keyword matcher
//!
//! Every list holds lowercase entries; callers lowercase their input first.

use crate::models::Category;

/// Keywords shorter than or equal to this many characters never match fuzzily
pub const FUZZY_MIN_KEYWORD_LEN: usize = 5;

/// Maximum token/keyword length difference considered for a fuzzy match
pub const FUZZY_MAX_LEN_DIFF: usize = 2;

/// Fraction of equal positions needed for a fuzzy match
pub const FUZZY_THRESHOLD: f64 = 0.7;

/// Words that signal money moving (validity filter)
pub const TRANSACTION_KEYWORDS: &[&str] = &[
    "bayar",
    "beli",
    "belanja",
    "buat",
    "kasih",
    "kirim",
    "transfer",
    "isi",
    "terima",
    "dapat",
    "gaji",
    "bonus",
    "jual",
    "makan",
    "shopping",
    "spent",
    "paid",
    "received",
    "income",
    "expense",
    "pengeluaran",
    "pemasukan",
    "keluar",
    "masuk",
    "topup",
    "top up",
];

/// Category hint words, checked in order; the first category with a hit wins
pub const CATEGORY_HINTS: &[(Category, &[&str])] = &[
    (Category::Salary, &["gaji", "gajian", "bonus", "thr", "salary", "honor"]),
    (
        Category::Bills,
        &[
            "listrik", "internet", "wifi", "pulsa", "kuota", "tagihan", "kos", "kost", "sewa",
            "cicilan", "pdam", "bpjs", "token",
        ],
    ),
    (
        Category::Transport,
        &[
            "bensin", "ojek", "ojol", "gojek", "grab", "parkir", "tol", "kereta", "krl", "bus",
            "taksi", "pertalite", "pertamax",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "netflix", "spotify", "bioskop", "nonton", "game", "konser", "youtube", "disney",
        ],
    ),
    (
        Category::Food,
        &[
            "makan", "minum", "kopi", "resto", "restoran", "warung", "jajan", "groceries",
            "sarapan", "bakso", "nasi", "snack",
        ],
    ),
    (
        Category::Shopping,
        &["belanja", "shopping", "baju", "sepatu", "tokopedia", "shopee", "beli"],
    ),
    (Category::Transfer, &["transfer", "kasih", "kirim", "tf"]),
];

/// Phrases that place a transaction in time
pub const TIME_EXPRESSIONS: &[&str] = &[
    "besok",
    "lusa",
    "kemarin",
    "kemaren",
    "tadi",
    "tanggal",
    "tgl",
    "hari lalu",
    "hari lagi",
    "minggu lalu",
    "seminggu",
    "bulan lalu",
    "yesterday",
    "tomorrow",
    "days ago",
];

/// Verbs counted by the multiplicity detector
pub const TRANSACTION_VERBS: &[&str] = &[
    "bayar", "beli", "buat", "kasih", "transfer", "isi", "kirim", "terima", "dapat", "jual",
    "gaji", "bonus", "makan", "belanja",
];

/// Separators that join several items in one message
pub const MULTI_INDICATORS: &[&str] = &[
    " dan ",
    " sama ",
    " terus ",
    " lalu ",
    " kemudian ",
    " juga ",
    " plus ",
    ", ",
    " serta ",
    " and ",
    " also ",
    " then ",
];

/// Words that mark money coming in
pub const INCOME_HINTS: &[&str] = &[
    "terima",
    "dapat",
    "dapet",
    "gaji",
    "gajian",
    "bonus",
    "jual",
    "masuk",
    "pemasukan",
    "income",
    "received",
    "thr",
];

pub const GREETINGS: &[&str] = &["halo", "hai", "hello", "hi", "hei", "hey"];

pub const HOW_ARE_YOU_PHRASES: &[&str] = &[
    "apa kabar",
    "apakabar",
    "how are you",
    "kabar",
    "gimana kabar",
];

pub const THANKS_PHRASES: &[&str] = &[
    "terima kasih",
    "terimakasih",
    "makasih",
    "thanks",
    "thank you",
    "thx",
    "mksh",
];

pub const FAREWELL_PHRASES: &[&str] = &[
    "bye",
    "dadah",
    "sampai jumpa",
    "see you",
    "selamat tinggal",
    "sampai nanti",
    "babay",
];

pub const ABOUT_APP_PHRASES: &[&str] = &[
    "ini app apa",
    "ini aplikasi apa",
    "ini web apa",
    "ini website apa",
    "ini buat apa",
    "fungsi app ini",
    "kegunaannya apa",
    "apa gunanya",
    "jelaskan app ini",
    "apa itu app ini",
    "untuk apa ini",
    "app ini ngapain",
    "web ini buat apa",
    "web ini buat ngapain",
    "web ini untuk apa",
    "gmna sih cara",
    "gimana sih cara",
    "bagaimana cara",
    "cara kerja",
    "gmna caranya",
    "gimana caranya",
    "gmna cara",
    "gimana cara",
];

/// Fraction of positions at which `a` and `b` hold the same character,
/// compared up to the shorter length
pub fn positional_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }

    let same = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    same as f64 / len as f64
}

/// Whether a single token is a plausible typo of `keyword`
pub fn fuzzy_token_match(token: &str, keyword: &str) -> bool {
    let keyword_len = keyword.chars().count();
    if keyword_len < FUZZY_MIN_KEYWORD_LEN {
        return false;
    }

    let token_len = token.chars().count();
    if token_len.abs_diff(keyword_len) > FUZZY_MAX_LEN_DIFF {
        return false;
    }

    positional_similarity(token, keyword) >= FUZZY_THRESHOLD
}

/// Whether `keyword` occurs in `text`, exactly or as a close typo
///
/// `text` must already be lowercase.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    if text.contains(keyword) {
        return true;
    }

    text.split_whitespace()
        .any(|token| fuzzy_token_match(token, keyword))
}

/// Whether any of `keywords` occurs in `text` (exact or fuzzy)
pub fn contains_any_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| contains_keyword(text, k))
}

/// Whether any phrase occurs verbatim in `text`
pub fn contains_any_phrase(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

/// First category whose hint words appear in `text` (exact or fuzzy)
pub fn category_hint(text: &str) -> Option<Category> {
    CATEGORY_HINTS
        .iter()
        .find(|(_, words)| contains_any_keyword(text, words))
        .map(|(category, _)| *category)
}

/// Whether `text` mentions a category hint word
pub fn has_category_hint(text: &str) -> bool {
    category_hint(text).is_some()
}
