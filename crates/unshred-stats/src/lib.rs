//! Statistical helpers for summarizing fitness distributions.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics (min, max, mean, median, variance, standard deviation)
//!
//! # Examples
//!
//! ```
//! use unshred_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod descriptive;
