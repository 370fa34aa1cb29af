// Copyright © 2025 mailgate
// Licensed under the MIT License

pub mod log;
