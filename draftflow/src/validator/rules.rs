//! Validator rule tables, evaluated in declaration order.

use std::sync::LazyLock;

use super::RuleTag;
use crate::rules::{compile_table, PatternRule};

/// Direct purchase, contact and promotion phrases.
pub(crate) static SALES_CTA: LazyLock<Vec<PatternRule<RuleTag>>> = LazyLock::new(|| {
    compile_table(&[
        (RuleTag::SalesCta, r"(?i)\bbeli sekarang\b", "purchase call to action"),
        (RuleTag::SalesCta, r"(?i)\b(?:pesan|order|daftar) sekarang\b", "order call to action"),
        (RuleTag::SalesCta, r"(?i)\bhubungi kami\b", "contact call to action"),
        (RuleTag::SalesCta, r"(?i)\bklik (?:di )?sini\b", "click call to action"),
        (RuleTag::SalesCta, r"(?i)\bdiskon\b", "discount offer"),
        (RuleTag::SalesCta, r"(?i)\bpromo\b", "promotion"),
        (RuleTag::SalesCta, r"(?i)\bgratis ongkir\b", "shipping offer"),
        (RuleTag::SalesCta, r"(?i)\bharga spesial\b", "price offer"),
        (RuleTag::SalesCta, r"(?i)\bkunjungi toko\b", "store visit call to action"),
        (RuleTag::SalesCta, r"(?i)\bwhatsapp\b|\bwa\.me\b", "messaging contact"),
    ])
});

/// Words that state certainty the article cannot back up.
pub(crate) static PROHIBITED: LazyLock<Vec<PatternRule<RuleTag>>> = LazyLock::new(|| {
    compile_table(&[
        (RuleTag::KataTerlarang, r"(?i)\bpasti\b", "absolute claim"),
        (RuleTag::KataTerlarang, r"(?i)\bterbukti\b", "unverifiable proof claim"),
        (RuleTag::KataTerlarang, r"(?i)\brahasia\b", "clickbait secret"),
        (RuleTag::KataTerlarang, r"(?i)\bdijamin\b", "guarantee"),
        (RuleTag::KataTerlarang, r"(?i)\bsatu-satunya\b", "exclusive claim"),
        (RuleTag::KataTerlarang, r"(?i)\b100% (?:aman|berhasil|ampuh|alami)", "absolute percentage claim"),
        (RuleTag::KataTerlarang, r"(?i)\btanpa efek samping\b", "safety claim"),
        (RuleTag::KataTerlarang, r"(?i)\bmenyembuhkan\b", "medical claim"),
    ])
});

/// Superlatives, urgency and guarantees.
pub(crate) static PROMOTIONAL: LazyLock<Vec<PatternRule<RuleTag>>> = LazyLock::new(|| {
    compile_table(&[
        (RuleTag::PromotionalTone, r"(?i)\bterbaik\b", "superlative"),
        (RuleTag::PromotionalTone, r"(?i)\btermurah\b", "price superlative"),
        (RuleTag::PromotionalTone, r"(?i)\bnomor (?:1|satu)\b", "ranking claim"),
        (RuleTag::PromotionalTone, r"(?i)\bpaling (?:ampuh|hebat|murah|laris)\b", "superlative"),
        (RuleTag::PromotionalTone, r"(?i)\bjangan sampai ketinggalan\b", "urgency"),
        (RuleTag::PromotionalTone, r"(?i)\b(?:waktu|stok|penawaran) terbatas\b", "scarcity"),
        (RuleTag::PromotionalTone, r"(?i)\bgaransi\b", "guarantee"),
        (RuleTag::PromotionalTone, r"(?i)\b(?:revolusioner|ajaib)\b", "hype"),
    ])
});

/// Leftover placeholders and model self-references.
pub(crate) static STRUCTURAL: LazyLock<Vec<PatternRule<RuleTag>>> = LazyLock::new(|| {
    compile_table(&[
        (RuleTag::StructuralPlaceholder, r"\b(?:TODO|TBD|XXX)\b", "unfinished marker"),
        (RuleTag::StructuralPlaceholder, r"(?i)\[(?:placeholder|insert|masukkan|isi)\b", "placeholder"),
        (RuleTag::StructuralPlaceholder, r"\{\{", "template variable"),
        (RuleTag::StructuralPlaceholder, r"(?i)\blorem ipsum\b", "filler text"),
        (
            RuleTag::StructuralAiReference,
            r"(?i)\bsebagai (?:sebuah )?(?:model bahasa|ai|kecerdasan buatan|asisten ai)\b",
            "model self-reference",
        ),
        (RuleTag::StructuralAiReference, r"(?i)\bas an? (?:ai|language model)\b", "model self-reference"),
        (
            RuleTag::StructuralAiReference,
            r"(?i)\b(?:saya|aku) (?:adalah|hanyalah) (?:sebuah )?(?:ai|model bahasa)\b",
            "model self-reference",
        ),
        (RuleTag::StructuralAiReference, r"(?i)\b(?:chatgpt|openai)\b", "model vendor mention"),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::first_match;

    #[test]
    fn test_tables_compile() {
        assert_eq!(SALES_CTA.len(), 10);
        assert_eq!(PROHIBITED.len(), 8);
        assert_eq!(PROMOTIONAL.len(), 8);
        assert_eq!(STRUCTURAL.len(), 8);
    }

    #[test]
    fn test_sales_cta_rows() {
        for text in ["Beli sekarang juga", "hubungi kami", "ada diskon", "Klik di sini"] {
            assert!(first_match(&SALES_CTA, text).is_some(), "{text}");
        }
        assert!(first_match(&SALES_CTA, "kompromi dan promosi").is_none());
    }

    #[test]
    fn test_prohibited_needs_whole_word() {
        assert!(first_match(&PROHIBITED, "hasil pasti").is_some());
        assert!(first_match(&PROHIBITED, "tanpa kepastian").is_none());
        assert!(first_match(&PROHIBITED, "100% aman").is_some());
    }

    #[test]
    fn test_structural_tags() {
        let hit = first_match(&STRUCTURAL, "Catatan: TODO isi bagian ini").unwrap();
        assert_eq!(hit.tag(), RuleTag::StructuralPlaceholder);
        let hit = first_match(&STRUCTURAL, "Sebagai model bahasa saya").unwrap();
        assert_eq!(hit.tag(), RuleTag::StructuralAiReference);
        assert!(first_match(&STRUCTURAL, "todo list harian").is_none());
    }
}
