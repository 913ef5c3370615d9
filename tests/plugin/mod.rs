mod pipeline;
mod settings;
