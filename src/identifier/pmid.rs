use once_cell::sync::Lazy;
use regex::Regex;

use crate::identifier::Identifier;

/// A PubMed record identifier, taken from a canonical `pubmed.ncbi.nlm.nih.gov/<digits>` URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pmid<'a> {
    id: &'a str,
}

impl<'a> Identifier<'a> for Pmid<'a> {
    fn parse(url: &'a str) -> Option<Self> {
        static DETECT_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"(?xi)^               # anchored
                (?:https?://)?         # optional scheme
                pubmed\.ncbi\.nlm\.nih\.gov
                /(?P<id>[0-9]+)        # numeric record id
                /?                     # optional trailing slash
                (?:[?\#].*)?           # optional query or fragment
                $",
            )
            .unwrap()
        });

        let caps = DETECT_RE.captures(url.trim())?;
        Some(Pmid {
            id: caps.name("id")?.as_str(),
        })
    }

    fn as_str(&self) -> &'a str {
        self.id
    }
}

impl<'a> Pmid<'a> {
    /// The id with leading zeros removed, when that differs from the id itself.
    pub fn unpadded(&self) -> Option<&'a str> {
        let trimmed = self.id.trim_start_matches('0');
        if trimmed.len() == self.id.len() || trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical_urls() {
        let cases = [
            ("https://pubmed.ncbi.nlm.nih.gov/11111111", "11111111"),
            ("https://pubmed.ncbi.nlm.nih.gov/11111111/", "11111111"),
            ("http://pubmed.ncbi.nlm.nih.gov/42", "42"),
            ("pubmed.ncbi.nlm.nih.gov/39876543", "39876543"),
            ("https://PubMed.NCBI.nlm.nih.gov/123?utm_source=x", "123"),
            ("  https://pubmed.ncbi.nlm.nih.gov/123#abstract  ", "123"),
        ];
        for (url, id) in cases {
            let pmid = Pmid::parse(url).unwrap_or_else(|| panic!("should parse {url}"));
            assert_eq!(pmid.as_str(), id);
        }
    }

    #[test]
    fn parse_rejects_near_misses() {
        let cases = [
            "",
            "https://pubmed.ncbi.nlm.nih.gov/",
            "https://pubmed.ncbi.nlm.nih.gov/abc",
            "https://pubmed.ncbi.nlm.nih.gov/123abc",
            "https://pubmed.ncbi.nlm.nih.gov/123/related",
            "https://pubmedXncbi.nlm.nih.gov/123",
            "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC123/",
            "https://example.com/?next=pubmed.ncbi.nlm.nih.gov/123",
            "https://pubmed.ncbi.nlm.nih.gov.evil.com/123",
            "ftp://pubmed.ncbi.nlm.nih.gov/123",
        ];
        for url in cases {
            assert!(Pmid::parse(url).is_none(), "should reject {url:?}");
        }
    }

    #[test]
    fn unpadded_strips_leading_zeros() {
        let pmid = Pmid::parse("https://pubmed.ncbi.nlm.nih.gov/00123").unwrap();
        assert_eq!(pmid.unpadded(), Some("123"));
        let pmid = Pmid::parse("https://pubmed.ncbi.nlm.nih.gov/123").unwrap();
        assert_eq!(pmid.unpadded(), None);
        let pmid = Pmid::parse("https://pubmed.ncbi.nlm.nih.gov/000").unwrap();
        assert_eq!(pmid.unpadded(), None);
    }

    #[test]
    fn parse_finds_generated_pmid() {
        proptest::proptest!(|(id in "[0-9]{1,9}", scheme in proptest::sample::select(vec!["", "http://", "https://"]), tail in proptest::sample::select(vec!["", "/", "?page=2", "/#x"]))| {
            let url = format!("{scheme}pubmed.ncbi.nlm.nih.gov/{id}{tail}");
            let pmid = Pmid::parse(&url).expect("should parse");
            proptest::prop_assert_eq!(pmid.as_str(), id.as_str());
        })
    }

    #[test]
    fn parse_rejects_other_hosts() {
        proptest::proptest!(|(host in "[a-z]{1,12}\\.(com|org|net)", id in "[0-9]{1,9}")| {
            proptest::prop_assume!(host != "pubmed.ncbi.nlm.nih.gov");
            let url = format!("https://{host}/{id}");
            proptest::prop_assert!(Pmid::parse(&url).is_none());
        })
    }
}
