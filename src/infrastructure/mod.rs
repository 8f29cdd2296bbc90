pub mod config;
pub mod external;
pub mod mock_data;
