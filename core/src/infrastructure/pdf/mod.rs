pub mod pdf_extract_reader;
