pub mod domain;
pub mod password;
pub mod ports;
pub mod token;

pub use domain::{
    InputFormat, OutputFormat, ProcessStatus, SpeechRequest, SpeechResult, SynthesisSpec, User,
    UserCredentials, UserPreference, VoiceSettings,
};
pub use ports::{DatabaseService, PortError, PortResult, SpeechSynthesisService};
pub use token::{Claims, TokenIssuer};
