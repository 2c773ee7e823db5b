//! Content encodings understood by the middleware and the selection of one of them
//! from a request's `Accept-Encoding` value.
//!
//! Selection is a cheap heuristic rather than RFC 9110 negotiation: quality values,
//! wildcards and `q=0` exclusions are not parsed. Every candidate token is looked up as a
//! substring of the raw header, and the first hit in [`Encoding::PRIORITY`] wins no matter
//! in which order the client listed its encodings.

use crate::error::UnknownEncoding;
use http::HeaderValue;
use std::fmt;
use std::str::FromStr;

/// A content coding with a canonical `Content-Encoding` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Brotli, token `br`.
    Br,
    /// zlib-wrapped deflate, token `deflate`.
    Deflate,
    /// Gzip, token `gzip`.
    Gzip,
    /// Zstandard, token `zstd`.
    Zstd,
}

impl Encoding {
    /// The fixed order in which encodings are tried, highest priority first.
    pub const PRIORITY: [Encoding; 4] = [Encoding::Br, Encoding::Deflate, Encoding::Gzip, Encoding::Zstd];

    /// Returns the canonical wire token.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Encoding::Br => "br",
            Encoding::Deflate => "deflate",
            Encoding::Gzip => "gzip",
            Encoding::Zstd => "zstd",
        }
    }

    /// Returns the token as a `Content-Encoding` header value.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Encoding::PRIORITY.into_iter().find(|encoding| encoding.as_str() == s).ok_or_else(|| UnknownEncoding(s.to_owned()))
    }
}

/// Picks at most one [`Encoding`] from a raw `Accept-Encoding` value.
///
/// This is the seam for a stricter negotiation strategy; the orchestrator and the codecs
/// only ever see the chosen [`Encoding`].
pub trait EncodingSelector: Send + Sync {
    fn select(&self, accept_encoding: &str) -> Option<Encoding>;
}

/// The default selector: first entry of [`Encoding::PRIORITY`] found as a substring.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrioritySelector;

impl EncodingSelector for PrioritySelector {
    #[inline]
    fn select(&self, accept_encoding: &str) -> Option<Encoding> {
        Encoding::PRIORITY.into_iter().find(|encoding| accept_encoding.contains(encoding.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::sample::subsequence;

    #[test]
    fn tokens() {
        let tokens: Vec<_> = Encoding::PRIORITY.iter().map(Encoding::as_str).collect();
        assert_eq!(tokens, ["br", "deflate", "gzip", "zstd"]);
        assert_eq!(Encoding::Gzip.header_value(), "gzip");
        assert_eq!(Encoding::Zstd.to_string(), "zstd");
    }

    #[test]
    fn parse_token() {
        assert_eq!("br".parse::<Encoding>(), Ok(Encoding::Br));
        assert_eq!("deflate".parse::<Encoding>(), Ok(Encoding::Deflate));
        assert_eq!("identity".parse::<Encoding>(), Err(UnknownEncoding("identity".into())));
        // tokens are matched exactly, case included
        assert!("GZIP".parse::<Encoding>().is_err());
    }

    #[test]
    fn select_single_token() {
        let selector = PrioritySelector;
        assert_eq!(selector.select("br"), Some(Encoding::Br));
        assert_eq!(selector.select("deflate"), Some(Encoding::Deflate));
        assert_eq!(selector.select("gzip"), Some(Encoding::Gzip));
        assert_eq!(selector.select("zstd"), Some(Encoding::Zstd));
    }

    #[test]
    fn select_nothing() {
        let selector = PrioritySelector;
        assert_eq!(selector.select(""), None);
        assert_eq!(selector.select("xxx"), None);
        assert_eq!(selector.select("identity, *"), None);
    }

    #[test]
    fn select_ignores_client_order_and_quality() {
        let selector = PrioritySelector;
        assert_eq!(selector.select("gzip;q=1.0, br;q=0.1"), Some(Encoding::Br));
        assert_eq!(selector.select("zstd, gzip, deflate"), Some(Encoding::Deflate));
        // q=0 is not an exclusion for this selector
        assert_eq!(selector.select("br;q=0, gzip"), Some(Encoding::Br));
    }

    #[test]
    fn select_matches_substrings() {
        // the `br` token inside another word still counts
        assert_eq!(PrioritySelector.select("x-brand-new"), Some(Encoding::Br));
        assert_eq!(PrioritySelector.select("x-gzip"), Some(Encoding::Gzip));
    }

    proptest! {
        #[test]
        fn highest_priority_wins(tokens in subsequence(Encoding::PRIORITY.to_vec(), 1..=4).prop_shuffle()) {
            let accept = tokens.iter().map(Encoding::as_str).collect::<Vec<_>>().join(", ");
            let expected = Encoding::PRIORITY.into_iter().find(|e| tokens.contains(e));
            prop_assert_eq!(PrioritySelector.select(&accept), expected);
        }

        #[test]
        fn unknown_tokens_select_nothing(accept in "[ace-fh-y0-9,;=. ]{0,40}") {
            // no `b`, `d`, `g` or `z`, so none of the four tokens can appear
            prop_assert_eq!(PrioritySelector.select(&accept), None);
        }
    }
}
