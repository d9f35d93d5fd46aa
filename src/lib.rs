//! Black-Scholes pricing and Greeks for European options, plus simple
//! simulators of the underlying asset (Brownian motion, geometric Brownian
//! motion, risk-free growth).
//!
//! Every pricing operation is a pure function of its explicit inputs and is
//! safe to call from any number of threads.
//!
//! ```rust
//! use vanilla_bs::models::OptionType;
//! use vanilla_bs::models::black_scholes::{price, risk_neutral_terms};
//! use vanilla_bs::models::greeks::{delta, gamma};
//!
//! let call = price(100.0, 100.0, 1.0, 0.01, 0.25, OptionType::Call).unwrap();
//! assert!((call - 10.4035).abs() < 1e-3);
//!
//! let terms = risk_neutral_terms(100.0, 100.0, 0.01, 1.0, 0.25).unwrap();
//! assert!((delta(OptionType::Call, terms.d1).unwrap() - 0.5655).abs() < 1e-3);
//! assert!((gamma(100.0, 1.0, 0.25, terms.d1).unwrap() - 0.0157).abs() < 1e-3);
//! ```

pub mod batch;
pub mod config;
pub mod errors;
pub mod models;
pub mod report;
pub mod simulation;

pub use batch::{
    delta_batch, gamma_batch, greeks_batch, price_batch, risk_neutral_terms_batch, theta_batch, Arg,
};
pub use errors::{PricingError, PricingResult};
pub use models::black_scholes::{price, risk_neutral_terms, BlackScholes};
pub use models::greeks::{delta, gamma, greeks, theta};
pub use models::{
    ContractParameters, GreeksResult, MarketParameters, OptionType, PricingModel, RiskNeutralTerms,
    Valuation,
};
