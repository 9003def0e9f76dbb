pub mod openai_embedding_client;
