pub mod dataset;
pub mod forecaster;
pub mod lstm_model;
pub mod predictor;
pub mod trainer;

pub use lstm_model::{LstmArchitecture, LstmPredictor};
pub use predictor::SequenceModel;
pub use trainer::{TrainedModel, Trainer, TrainingReport};
