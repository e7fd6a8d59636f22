// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to load PDF: {0}")]
    Load(String),

    #[error("Wrong or missing document password")]
    BadPassword,
}

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Failed to open spreadsheet: {0}")]
    Open(#[from] calamine::Error),

    #[error("Spreadsheet has no worksheets")]
    NoWorksheet,

    #[error("Spreadsheet has no header row")]
    EmptySheet,

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Failed to write output workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Spreadsheet handling failed: {0}")]
    Sheet(#[from] SheetError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
