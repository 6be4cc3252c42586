mod configuration;
mod progress;
