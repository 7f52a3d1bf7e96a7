pub mod channels;
pub mod dispatcher;
pub mod message;
pub mod phone;

pub use channels::{BroadcastChannel, ChannelError, PushbulletClient, SmsChannel, TwilioClient};
pub use dispatcher::{AlertDispatcher, AlertOutcome, ChannelReport, ProviderDispatcher};
pub use phone::NormalizedContact;
