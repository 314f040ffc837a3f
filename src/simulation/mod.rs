pub mod correction;
pub mod delivery;

pub use correction::{AddressCorrection, CorrectedAddress, NoCorrection, TimedAddressCorrection};
pub use delivery::{run_delivery, select_next_package, DeliverySimulator};
