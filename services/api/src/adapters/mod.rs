pub mod db;
pub mod tts;

pub use db::PgAdapter;
pub use tts::OpenAiTtsAdapter;
