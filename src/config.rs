/// Catalog behavior configuration.
///
/// Currently covers paging defaults and caps for listing queries.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Page size used when a request asks for zero items per page.
    pub default_page_size: usize,

    /// Hard cap on items per page.
    pub max_page_size: usize,
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }

    /// Set the default page size
    pub fn default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Set the maximum page size
    pub fn max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = size;
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new()
    }
}
