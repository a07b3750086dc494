use crate::config::MIN_TOKEN_CHARS;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref PUNCT: Regex = Regex::new(r"[^\p{L}\p{N}\s]").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            // English
            "a","about","above","after","again","against","all","am","an","and","any","are","arent","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cant","cannot","could","couldnt",
            "did","didnt","do","does","doesnt","doing","dont","down","during",
            "each","else","few","for","from","further",
            "had","hadnt","has","hasnt","have","havent","having","he","hed","hell","hes","her","here","heres","hers","herself","him","himself","his","how","hows",
            "i","id","ill","im","ive","if","in","into","is","isnt","it","its","itself","just",
            "lets","me","more","most","mustnt","my","myself",
            "no","nor","not","now","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","shed","shell","shes","should","shouldnt","so","some","such",
            "than","that","thats","the","their","theirs","them","themselves","then","there","theres","these","they","theyd","theyll","theyre","theyve","this","those","through","to","too",
            "under","until","up","very",
            "was","wasnt","we","wed","well","were","weve","werent","what","whats","when","whens","where","wheres","which","while","who","whos","whom","why","whys","will","with","wont","would","wouldnt",
            "you","youd","youll","youre","youve","your","yours","yourself","yourselves",
            // Indonesian
            "dan","atau","tetapi","tapi","namun","sedangkan","melainkan","padahal","jika","bila",
            "kalau","supaya","agar","untuk","guna","bagi","demi","karena","sebab","maka",
            "sehingga","sampai","hingga","yang","ini","itu","pada","di","ke","dari",
            "oleh","dengan","secara","menurut","antara","adalah","ialah","merupakan","yaitu",
            "yakni","seperti","bagai","bagaikan","laksana","bak","tentang","mengenai","terhadap",
            "akan","sedang","telah","sudah","belum","bisa","dapat","harus","wajib","mesti",
            "boleh","mungkin","barangkali","pasti","tentu","tidak","bukan","jangan","sekali",
            "sangat","amat","paling","lebih","kurang","cukup","terlalu","hanya","cuma","saja",
            "lagi","pun","juga","kan","lah","kah","tah","ada","tiada","saya","aku",
            "kita","kami","anda","kamu","dia","mereka","apa","siapa","kapan","dimana",
            "mengapa","bagaimana","berapa"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Reduces an inflected, already lowercased token to its root.
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Leaves tokens untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStemmer;

impl Stemmer for NoopStemmer {
    fn stem(&self, token: &str) -> String { token.to_string() }
}

/// Snowball stemmer from `rust-stemmers`.
pub struct SnowballStemmer {
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { inner: rust_stemmers::Stemmer::create(algorithm) }
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, token: &str) -> String { self.inner.stem(token).into_owned() }
}

/// Stemmer selection as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemmerKind {
    None,
    #[default]
    English,
    Dutch,
    French,
    German,
    Italian,
    Portuguese,
    Spanish,
}

impl StemmerKind {
    pub fn build(self) -> Arc<dyn Stemmer> {
        let algorithm = match self {
            StemmerKind::None => return Arc::new(NoopStemmer),
            StemmerKind::English => Algorithm::English,
            StemmerKind::Dutch => Algorithm::Dutch,
            StemmerKind::French => Algorithm::French,
            StemmerKind::German => Algorithm::German,
            StemmerKind::Italian => Algorithm::Italian,
            StemmerKind::Portuguese => Algorithm::Portuguese,
            StemmerKind::Spanish => Algorithm::Spanish,
        };
        Arc::new(SnowballStemmer::new(algorithm))
    }

    fn name(self) -> &'static str {
        match self {
            StemmerKind::None => "none",
            StemmerKind::English => "english",
            StemmerKind::Dutch => "dutch",
            StemmerKind::French => "french",
            StemmerKind::German => "german",
            StemmerKind::Italian => "italian",
            StemmerKind::Portuguese => "portuguese",
            StemmerKind::Spanish => "spanish",
        }
    }
}

impl fmt::Display for StemmerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for StemmerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(StemmerKind::None),
            "english" | "en" => Ok(StemmerKind::English),
            "dutch" | "nl" => Ok(StemmerKind::Dutch),
            "french" | "fr" => Ok(StemmerKind::French),
            "german" | "de" => Ok(StemmerKind::German),
            "italian" | "it" => Ok(StemmerKind::Italian),
            "portuguese" | "pt" => Ok(StemmerKind::Portuguese),
            "spanish" | "es" => Ok(StemmerKind::Spanish),
            other => Err(format!("unknown stemmer `{other}`")),
        }
    }
}

/// Shared normalization pipeline: NFKC, lowercase, punctuation removal, whitespace split,
/// short-token and stopword filtering, stemming.
#[derive(Clone)]
pub struct Tokenizer {
    stemmer: Arc<dyn Stemmer>,
}

impl Default for Tokenizer {
    fn default() -> Self { Self::new(StemmerKind::default()) }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_struct("Tokenizer").finish_non_exhaustive() }
}

impl Tokenizer {
    pub fn new(kind: StemmerKind) -> Self { Self { stemmer: kind.build() } }

    pub fn with_stemmer(stemmer: Arc<dyn Stemmer>) -> Self { Self { stemmer } }

    /// Full pipeline, tokens in text order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.surface_terms(text).into_iter().map(|t| self.stem(&t)).collect()
    }

    /// Stems one surface term.
    pub fn stem(&self, term: &str) -> String { self.stemmer.stem(term) }

    /// The pipeline without stemming: every kept token is a word as written (lowercased).
    pub fn surface_terms(&self, text: &str) -> Vec<String> {
        clean(text)
            .split_whitespace()
            .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS && !is_stopword(t))
            .map(str::to_string)
            .collect()
    }

    /// Normalizes one query word with no length or stopword filter. `None` if nothing is left.
    pub fn normalize_term(&self, word: &str) -> Option<String> {
        let cleaned = clean(word);
        let cleaned = cleaned.trim();
        if cleaned.is_empty() || cleaned.contains(char::is_whitespace) {
            return None;
        }
        Some(self.stemmer.stem(cleaned))
    }
}

fn clean(text: &str) -> String {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    PUNCT.replace_all(&lowered, "").into_owned()
}

/// Tokenize with the default (English) stemmer.
pub fn tokenize(text: &str) -> Vec<String> {
    lazy_static! {
        static ref DEFAULT: Tokenizer = Tokenizer::default();
    }
    DEFAULT.tokenize(text)
}
