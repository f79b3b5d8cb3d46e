pub mod pmid;

/// A record key that can be recovered from a search result's URL and used to address the record
/// in the metadata service.
pub trait Identifier<'a>: Sized + 'a {
    fn parse(url: &'a str) -> Option<Self>;
    fn as_str(&self) -> &'a str;
}
