// src/document/mod.rs
pub mod grid;
pub mod pdf;

/// A tabular region recovered from a page: rows of text cells, header first.
pub type TableGrid = Vec<Vec<String>>;

/// Extracted content of one document page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Table grids recovered from the page layout.
    pub tables: Vec<TableGrid>,
    /// Raw extractable text, consumed when tables are absent or useless.
    pub text: String,
}
