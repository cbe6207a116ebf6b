pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod markdown_parser;
pub mod output;
pub mod run;
pub mod storage;
pub mod todo;
