// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod agenda;
pub mod budget;
pub mod doctor;
pub mod expenses;
pub mod income;
pub mod installments;
pub mod reports;
pub mod settings;
pub mod subscriptions;
