pub mod embedding;
pub mod llm;
pub mod pdf;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod test_server;
