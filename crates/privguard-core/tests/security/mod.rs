mod entropy_quality;
mod positional_distribution;
