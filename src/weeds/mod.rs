pub mod weed_info;
pub mod weed_type;
