// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridPulse.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

pub mod eirgrid;
pub mod openai;
pub mod source;

pub use eirgrid::{EirGridClient, EirGridError, EirGridResult, EirGridSettings, Region};
pub use openai::{LlmError, LlmResult, LlmSettings, OpenAiClient};
pub use source::GridDataSource;
