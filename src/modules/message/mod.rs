// Copyright © 2025 mailgate
// Licensed under the MIT License

pub mod delete;
pub mod flag;
pub mod list;
pub mod mv;
