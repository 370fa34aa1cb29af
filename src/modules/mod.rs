// Copyright © 2025 mailgate
// Licensed under the MIT License

pub mod address;
pub mod backend;
pub mod common;
pub mod error;
pub mod logger;
pub mod mailbox;
pub mod message;
pub mod payload;
pub mod rest;
pub mod settings;
pub mod utils;
