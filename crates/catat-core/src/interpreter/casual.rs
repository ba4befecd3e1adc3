//! Casual chat detection
//!
//! Greetings, small talk, thanks, farewells and questions about the app get a
//! canned reply instead of going to the extractor.

use serde::Serialize;

use super::keywords::{
    contains_any_phrase, ABOUT_APP_PHRASES, FAREWELL_PHRASES, GREETINGS, HOW_ARE_YOU_PHRASES,
    THANKS_PHRASES,
};
use super::replies::{choose, ReplyPicker};

/// Kind of non-transaction message, in detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CasualIntent {
    Greeting,
    HowAreYou,
    Thanks,
    Farewell,
    AboutApp,
}

impl CasualIntent {
    /// Reply variants for this intent
    pub fn replies(&self) -> &'static [&'static str] {
        match self {
            Self::Greeting => &[
                "Hai juga! Ada transaksi yang mau dicatat? 😊",
                "Halo! Mau cerita soal transaksi apa hari ini?",
                "Hai! Yuk ceritain pengeluaran atau pemasukan kamu",
                "Hei! Siap bantu catat keuangan kamu nih 💰",
            ],
            Self::HowAreYou => &[
                "Baik dong! Kamu gimana? Ada transaksi yang perlu dicatat? 😄",
                "Alhamdulillah baik! Yuk cerita soal keuangan kamu hari ini",
                "Baik-baik aja! Nah sekarang kita fokus ke keuangan kamu yuk",
                "Good! Btw ada pengeluaran atau pemasukan yang mau dicatat?",
            ],
            Self::Thanks => &[
                "Sama-sama! Senang bisa bantu 😊",
                "Sip! Kapan-kapan catat transaksi lagi ya",
                "No problem! Ada lagi yang mau dicatat?",
                "Oke! Nanti kalau ada transaksi lagi langsung chat aja ya",
            ],
            Self::Farewell => &[
                "Oke sampai jumpa! Jaga keuangan ya 👋",
                "Bye! Semangat atur keuangannya",
                "See you! Jangan lupa catat transaksi terus ya",
                "Dadah! Nanti balik lagi kalau ada transaksi baru",
            ],
            Self::AboutApp => &[
                "Jadi gini, ini tuh kayak asisten pribadi kamu buat ngatur duit! Tinggal chat aja mau catat pengeluaran atau pemasukan. Misal 'bayar makan 50rb' langsung aku tangkap dan simpan. Nanti semua data keuangan kamu bisa diliat di dashboard 💸",
                "Simpel aja sih, ini platform buat kamu yang males ribet nyatet uang keluar masuk. Cukup ngobrol santai, cerita 'tadi belanja 100rb' atau 'dapet gaji 5 juta', auto kesimpen. Plus ada dashboard biar kamu tau kemana aja duit kamu pergi 📊",
                "Ini aplikasi keuangan yang konsepnya conversational. Mau catat pengeluaran? Tinggal bilang 'bayar kos 1.5jt kemarin' langsung oke. Semua transaksi bisa kamu tracking di dashboard 🎯",
                "Sederhananya, ini finance tracker yang pake AI. Gak perlu isi form ribet, chat aja kayak lagi ngobrol, misal 'isi bensin 150k tadi pagi' atau '2 hari lalu bayar netflix 50rb', aku langsung ngerti dan catat 💰",
                "Fitur utamanya chat kayak gini yang bisa nangkep transaksi dari obrolan natural. Cerita aja 'tadi belanja groceries 200rb' atau 'kemarin terima bonus 1jt', langsung tercatat rapi, dan ringkasannya ada di dashboard 📱",
            ],
        }
    }
}

/// Classify `text` as casual chat, without picking a reply
///
/// Input is trimmed and lowercased here; the first matching intent wins.
pub fn casual_intent(text: &str) -> Option<CasualIntent> {
    let lower = text.trim().to_lowercase();

    let is_greeting = GREETINGS.iter().any(|g| {
        lower == *g
            || lower
                .strip_prefix(*g)
                .is_some_and(|rest| rest.starts_with(' '))
    });
    if is_greeting {
        return Some(CasualIntent::Greeting);
    }

    if contains_any_phrase(&lower, HOW_ARE_YOU_PHRASES) {
        return Some(CasualIntent::HowAreYou);
    }
    if contains_any_phrase(&lower, THANKS_PHRASES) {
        return Some(CasualIntent::Thanks);
    }
    if contains_any_phrase(&lower, FAREWELL_PHRASES) {
        return Some(CasualIntent::Farewell);
    }
    if contains_any_phrase(&lower, ABOUT_APP_PHRASES) {
        return Some(CasualIntent::AboutApp);
    }

    None
}

/// Reply to casual chat, or `None` when the text should be parsed as a transaction
pub fn detect_casual_chat(text: &str, picker: &dyn ReplyPicker) -> Option<String> {
    casual_intent(text).map(|intent| choose(picker, intent.replies()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::replies::{FixedPicker, RandomPicker};

    #[test]
    fn test_greeting_exact_and_prefix() {
        assert_eq!(casual_intent("halo"), Some(CasualIntent::Greeting));
        assert_eq!(casual_intent("  Hai kak  "), Some(CasualIntent::Greeting));
        assert_eq!(casual_intent("hi there"), Some(CasualIntent::Greeting));
        // "hi" followed by letters is not a greeting
        assert_eq!(casual_intent("hiking 50rb"), None);
    }

    #[test]
    fn test_greeting_reply_from_greeting_set() {
        let reply = detect_casual_chat("halo", &RandomPicker).unwrap();
        assert!(CasualIntent::Greeting.replies().contains(&reply.as_str()));
    }

    #[test]
    fn test_fixed_picker_selects_variant() {
        let reply = detect_casual_chat("makasih ya", &FixedPicker(1)).unwrap();
        assert_eq!(reply, CasualIntent::Thanks.replies()[1]);
    }

    #[test]
    fn test_priority_greeting_before_thanks() {
        assert_eq!(
            casual_intent("halo makasih banyak"),
            Some(CasualIntent::Greeting)
        );
        assert_eq!(
            casual_intent("apa kabar? makasih"),
            Some(CasualIntent::HowAreYou)
        );
    }

    #[test]
    fn test_other_intents() {
        assert_eq!(casual_intent("Terima kasih!"), Some(CasualIntent::Thanks));
        assert_eq!(casual_intent("oke bye"), Some(CasualIntent::Farewell));
        assert_eq!(
            casual_intent("ini app apa sih?"),
            Some(CasualIntent::AboutApp)
        );
        assert_eq!(
            casual_intent("gimana caranya pakai ini"),
            Some(CasualIntent::AboutApp)
        );
    }

    #[test]
    fn test_transaction_falls_through() {
        assert_eq!(detect_casual_chat("bayar makan 50rb", &RandomPicker), None);
        assert_eq!(casual_intent("terima gaji 5jt"), None);
    }

    #[test]
    fn test_every_intent_has_replies() {
        for intent in [
            CasualIntent::Greeting,
            CasualIntent::HowAreYou,
            CasualIntent::Thanks,
            CasualIntent::Farewell,
            CasualIntent::AboutApp,
        ] {
            assert!(!intent.replies().is_empty());
        }
    }
}
