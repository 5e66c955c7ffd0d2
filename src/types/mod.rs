// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types watched by the e2e suite.

pub mod athenz_domain;

pub use athenz_domain::{AthenzDomain, AthenzDomainSpec, AthenzDomainStatus, DomainData};
