// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod controller;
pub mod defaults;
pub mod forms;
pub mod ids;
pub mod model;
pub mod query;
pub mod state;
pub mod urls;

pub use controller::*;
pub use defaults::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use query::*;
pub use state::*;
pub use urls::*;
