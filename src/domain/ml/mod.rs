pub mod forecast;
pub mod scaler;
pub mod window;

pub use forecast::{Forecast, future_dates};
pub use scaler::MinMaxScaler;
pub use window::Window;
