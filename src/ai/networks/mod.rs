mod quality_network;

pub use quality_network::{QualityNetwork, QualityNetworkConfig};
