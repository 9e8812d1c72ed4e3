// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: local persistence and project/outline files.

pub mod outline;
pub mod serialization;
pub mod storage;
