/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use serde::Serialize;

#[derive(Debug, Serialize, thiserror::Error)]
pub enum AppError {
    #[error("Error reading config : {0}")]
    ConfigReadFailed(String),
    #[error("Failed to setup logger : {0}")]
    LoggerSetupFailed(String),
    #[error("Error opening file: {0}")]
    InputOpenFailed(String),
    #[error("Error reading CSV: {0}")]
    InputReadFailed(String),
    #[error("Error writing to CSV: {0}")]
    OutputWriteFailed(String),
    #[error("Fare computation failed for delivery {0} : {1}")]
    GroupComputationFailed(String, String),
    #[error("Failed to start runtime : {0}")]
    RuntimeStartFailed(String),
}

impl AppError {
    pub fn code(&self) -> String {
        match self {
            AppError::ConfigReadFailed(_) => "CONFIG_READ_FAILED",
            AppError::LoggerSetupFailed(_) => "LOGGER_SETUP_FAILED",
            AppError::InputOpenFailed(_) => "INPUT_OPEN_FAILED",
            AppError::InputReadFailed(_) => "INPUT_READ_FAILED",
            AppError::OutputWriteFailed(_) => "OUTPUT_WRITE_FAILED",
            AppError::GroupComputationFailed(_, _) => "GROUP_COMPUTATION_FAILED",
            AppError::RuntimeStartFailed(_) => "RUNTIME_START_FAILED",
        }
        .to_string()
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        AppError::InputReadFailed(error.to_string())
    }
}
