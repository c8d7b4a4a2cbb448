//! Synonym table for query expansion.
//!
//! The table maps a canonical lowercase term to the set of terms that
//! should also be searched when the user types it. Relations are stored
//! exactly as written: `boy → men` does not imply `men → boy`. Lookups never
//! fail; an unknown term simply has no variants.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::config::VocabularyConfig;
use crate::error::{ExpanseError, Result};
use crate::util::read_to_string_limited;

/// The set of terms searched for a single token (the token plus its variants).
pub type ExpansionSet = BTreeSet<String>;

static NO_VARIANTS: BTreeSet<String> = BTreeSet::new();

/// Production vocabulary for the listings catalog.
///
/// This is product data. Edit entries here, not in the compiler.
pub static DEFAULT_VOCABULARY: &[(&str, &[&str])] = &[
    // Gender and demographic
    ("men", &["male", "boy", "gent"]),
    ("man", &["men", "male", "gent"]),
    ("male", &["men", "boy", "gent"]),
    ("gent", &["men", "male"]),
    ("gents", &["men", "male", "gent"]),
    ("boy", &["men", "male", "boys"]),
    ("boys", &["boy", "men", "male"]),
    ("women", &["female", "girl", "lady", "ladies"]),
    ("woman", &["women", "female", "lady"]),
    ("female", &["women", "girl", "lady"]),
    ("girl", &["women", "female", "girls"]),
    ("girls", &["girl", "women", "female"]),
    ("lady", &["women", "female", "ladies"]),
    ("ladies", &["women", "female", "lady"]),
    ("kid", &["kids", "child", "children", "boy", "girl"]),
    ("kids", &["kid", "child", "children"]),
    ("child", &["kid", "kids", "children"]),
    ("baby", &["infant", "toddler", "kid"]),
    ("unisex", &["men", "women"]),
    // Jewellery
    ("jewellery", &["jewelry", "jewels", "ornament", "ornaments"]),
    ("jewelry", &["jewellery", "jewels", "ornament"]),
    ("necklace", &["chain", "haar", "pendant", "choker"]),
    ("earrings", &["earring", "jhumka", "jhumki", "studs", "danglers"]),
    ("earring", &["earrings", "jhumka", "studs"]),
    ("jhumka", &["jhumki", "earrings", "earring"]),
    ("bangle", &["bangles", "kada", "bracelet"]),
    ("bangles", &["bangle", "kada", "bracelet"]),
    ("bracelet", &["bangle", "kada", "cuff"]),
    ("ring", &["rings", "band"]),
    ("anklet", &["payal", "ankle"]),
    ("tikka", &["maangtikka", "maang", "headpiece"]),
    ("nosering", &["nath", "nosepin"]),
    // Footwear
    ("shoes", &["shoe", "footwear", "sneakers"]),
    ("shoe", &["shoes", "footwear"]),
    ("footwear", &["shoes", "sandals", "heels", "juttis"]),
    ("sandals", &["sandal", "slippers", "chappal"]),
    ("heels", &["heel", "stilettos", "pumps"]),
    ("juttis", &["jutti", "mojari", "mojaris"]),
    ("sneakers", &["shoes", "trainers"]),
    // Apparel
    ("dress", &["gown", "frock", "outfit"]),
    ("gown", &["dress", "anarkali"]),
    ("saree", &["sari", "saris", "sarees"]),
    ("sari", &["saree", "sarees"]),
    ("lehenga", &["lehnga", "ghagra", "chaniya"]),
    ("kurta", &["kurti", "kurtas", "tunic"]),
    ("kurti", &["kurta", "tunic"]),
    ("sherwani", &["achkan", "bandhgala"]),
    ("suit", &["blazer", "tuxedo", "suits"]),
    ("blazer", &["suit", "jacket", "coat"]),
    ("jacket", &["coat", "blazer"]),
    ("shirt", &["shirts", "top"]),
    ("top", &["tops", "blouse", "shirt"]),
    ("blouse", &["top", "choli"]),
    ("jeans", &["denim", "denims"]),
    ("trousers", &["pants", "pant"]),
    ("pants", &["trousers", "pant"]),
    ("dupatta", &["stole", "chunni", "scarf"]),
    ("shawl", &["stole", "wrap"]),
    // Style and occasion
    ("casual", &["everyday", "daily", "informal"]),
    ("festive", &["festival", "party", "celebration"]),
    ("formal", &["office", "business", "professional"]),
    ("bridal", &["bride", "wedding", "marriage"]),
    ("wedding", &["bridal", "marriage", "shaadi"]),
    ("party", &["partywear", "festive", "evening"]),
    ("traditional", &["ethnic", "desi", "cultural"]),
    // Material
    ("cotton", &["khadi", "linen"]),
    ("silk", &["satin", "banarasi", "kanjeevaram"]),
    ("leather", &["suede", "faux"]),
    ("velvet", &["velour"]),
    ("denim", &["jeans"]),
    ("gold", &["golden"]),
    ("silver", &["sterling", "oxidised", "oxidized"]),
    ("wool", &["woolen", "woollen", "pashmina"]),
    // Color
    ("red", &["maroon", "burgundy", "crimson", "ruby"]),
    ("maroon", &["red", "burgundy", "wine"]),
    ("pink", &["rose", "blush", "fuchsia", "magenta"]),
    ("blue", &["navy", "azure", "cobalt", "turquoise"]),
    ("navy", &["blue", "indigo"]),
    ("green", &["olive", "emerald", "mint", "teal"]),
    ("yellow", &["mustard", "lemon", "golden"]),
    ("orange", &["saffron", "rust", "peach"]),
    ("purple", &["violet", "lavender", "lilac", "mauve"]),
    ("white", &["ivory", "cream", "offwhite"]),
    ("black", &["charcoal", "jet", "ebony"]),
    ("brown", &["tan", "beige", "chocolate", "coffee"]),
    ("grey", &["gray", "silver", "ash"]),
    ("gray", &["grey", "silver"]),
    // Cultural and regional
    ("desi", &["ethnic", "indian", "traditional"]),
    ("ethnic", &["desi", "traditional", "indian"]),
    ("western", &["modern", "contemporary", "indowestern"]),
    ("indowestern", &["fusion", "western", "ethnic"]),
    // General goods
    ("bag", &["purse", "handbag", "clutch", "tote"]),
    ("purse", &["bag", "handbag", "wallet", "clutch"]),
    ("clutch", &["purse", "bag"]),
    ("phone", &["mobile", "smartphone", "cellphone"]),
    ("mobile", &["phone", "smartphone"]),
    ("watch", &["watches", "timepiece", "wristwatch"]),
    ("sunglasses", &["shades", "goggles"]),
    ("camera", &["dslr", "cam"]),
];

/// Immutable mapping from canonical term to related terms.
///
/// Build one at startup and share it behind an `Arc`; there is no way to
/// mutate a table after construction. Customized vocabularies are new
/// tables produced by [`SynonymTable::with_overrides`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymTable {
    entries: HashMap<String, BTreeSet<String>>,
}

/// On-disk shape of a custom vocabulary file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VocabularyFile {
    synonyms: BTreeMap<String, Vec<String>>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::from_entries(
            DEFAULT_VOCABULARY
                .iter()
                .map(|(term, variants)| (*term, variants.iter().copied())),
        )
    }
}

impl SynonymTable {
    /// A table with no entries. Every token expands to itself only.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Build a table from `(canonical, variants)` pairs.
    ///
    /// Repeated canonical terms are unioned.
    pub fn from_entries<I, K, V, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (term, variants) in entries {
            map.entry(term.into())
                .or_default()
                .extend(variants.into_iter().map(Into::into));
        }
        Self { entries: map }
    }

    /// Variants configured for `term`, or an empty set.
    ///
    /// `term` must already be lowercase.
    pub fn lookup(&self, term: &str) -> &BTreeSet<String> {
        self.entries.get(term).unwrap_or(&NO_VARIANTS)
    }

    /// The token together with its variants. Never empty.
    pub fn expand(&self, token: &str) -> ExpansionSet {
        let mut set = self.lookup(token).clone();
        set.insert(token.to_string());
        set
    }

    /// Whether `term` has an entry of its own.
    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    /// Number of canonical terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A new table where every entry of `overrides` replaces the entry for
    /// the same canonical term in `self`.
    pub fn with_overrides(&self, overrides: &SynonymTable) -> SynonymTable {
        let mut entries = self.entries.clone();
        for (term, variants) in &overrides.entries {
            entries.insert(term.clone(), variants.clone());
        }
        SynonymTable { entries }
    }

    /// Parse a custom vocabulary from TOML.
    ///
    /// ```toml
    /// [synonyms]
    /// saree = ["sari", "drape"]
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a serialization error for invalid TOML and a vocabulary
    /// error for keys outside `[a-z0-9]+` or variants that are empty or
    /// not lowercase.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: VocabularyFile =
            toml::from_str(content).map_err(|e| ExpanseError::serde(e.to_string()))?;

        for (term, variants) in &file.synonyms {
            validate_entry(term, variants)?;
        }

        Ok(Self::from_entries(file.synonyms))
    }

    /// Load a custom vocabulary file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = read_to_string_limited(path)?;
        let table = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            entries = table.len(),
            "loaded custom vocabulary"
        );
        Ok(table)
    }

    /// Build the table described by configuration: the default vocabulary
    /// (unless disabled) with the custom file layered on top.
    pub fn from_config(config: &VocabularyConfig) -> Result<Self> {
        let base = if config.include_defaults {
            Self::default()
        } else {
            Self::empty()
        };

        match &config.path {
            Some(path) => Ok(base.with_overrides(&Self::load_file(path)?)),
            None => Ok(base),
        }
    }
}

fn validate_entry(term: &str, variants: &[String]) -> Result<()> {
    if term.is_empty()
        || !term
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(ExpanseError::vocabulary(
            term,
            "canonical terms must be lowercase letters and digits only",
        ));
    }

    for variant in variants {
        if variant.trim().is_empty() {
            return Err(ExpanseError::vocabulary(term, "variants must not be empty"));
        }
        if variant.to_lowercase() != *variant {
            return Err(ExpanseError::vocabulary(
                term,
                format!("variant '{}' must be lowercase", variant),
            ));
        }
    }

    Ok(())
}
