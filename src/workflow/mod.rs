//! End-to-end walkthroughs built from the library pieces

pub mod freeze;
pub mod payment;

pub use freeze::{FreezeReport, FreezeSettings, FreezeWorkflow, StepReport, TEC_PATH_DRY};
pub use payment::{
    send_payment, PaymentReport, PaymentRequest, SAMPLE_ACCOUNT_SEED, SAMPLE_DESTINATION,
};
