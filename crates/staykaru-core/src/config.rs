//! Configuration module
//!
//! Environment-driven configuration for the HTTP server and the upload
//! pipeline. `Config::from_env` loads `.env` through dotenvy first.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_FILE_SIZE_MB: u64 = 5;
const MAX_FILES_PER_UPLOAD: usize = 10;
const IMAGE_QUALITY: u8 = 85;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const ACCOMMODATION_IMAGE_SIZE: &str = "1200x800";
const FOOD_PROVIDER_IMAGE_SIZE: &str = "1000x800";
const MENU_ITEM_IMAGE_SIZE: &str = "600x400";

/// Target box for a preset, parsed from "WxH", "Wx" or "xH".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensionsSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageDimensionsSpec {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        let parts: Vec<&str> = s.trim().split('x').collect();

        if parts.len() != 2 {
            return Err("Invalid dimensions format. Expected: WxH, Wx, or xH".to_string());
        }

        let parse_side = |part: &str, name: &str| -> Result<Option<u32>, String> {
            if part.is_empty() {
                return Ok(None);
            }
            match part.parse::<u32>() {
                Ok(0) | Err(_) => Err(format!("Invalid {}: {}", name, part)),
                Ok(v) => Ok(Some(v)),
            }
        };

        let width = parse_side(parts[0], "width")?;
        let height = parse_side(parts[1], "height")?;

        if width.is_none() && height.is_none() {
            return Err("At least one dimension must be specified".to_string());
        }

        Ok(ImageDimensionsSpec { width, height })
    }
}

impl FromStr for ImageDimensionsSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub environment: String,
    pub request_timeout_secs: u64,
}

/// Upload pipeline settings
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub uploads_root_dir: PathBuf,
    pub images_url_prefix: String,
    pub max_file_size_bytes: u64,
    pub max_files_per_upload: usize,
    pub image_quality: u8,
    pub accommodation_image_size: ImageDimensionsSpec,
    pub food_provider_image_size: ImageDimensionsSpec,
    pub menu_item_image_size: ImageDimensionsSpec,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            uploads_root_dir: PathBuf::from("uploads"),
            images_url_prefix: "/images".to_string(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_files_per_upload: MAX_FILES_PER_UPLOAD,
            image_quality: IMAGE_QUALITY,
            accommodation_image_size: ImageDimensionsSpec::new(1200, 800),
            food_provider_image_size: ImageDimensionsSpec::new(1000, 800),
            menu_item_image_size: ImageDimensionsSpec::new(600, 400),
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let image_quality = env::var("IMAGE_QUALITY")
            .unwrap_or_else(|_| IMAGE_QUALITY.to_string())
            .parse::<u8>()
            .unwrap_or(IMAGE_QUALITY);

        Ok(UploadConfig {
            uploads_root_dir: PathBuf::from(
                env::var("UPLOADS_ROOT_DIR").unwrap_or_else(|_| "uploads".to_string()),
            ),
            images_url_prefix: env::var("IMAGES_URL_PREFIX")
                .unwrap_or_else(|_| "/images".to_string())
                .trim_end_matches('/')
                .to_string(),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_files_per_upload: env::var("MAX_FILES_PER_UPLOAD")
                .unwrap_or_else(|_| MAX_FILES_PER_UPLOAD.to_string())
                .parse()
                .unwrap_or(MAX_FILES_PER_UPLOAD),
            image_quality,
            accommodation_image_size: preset_from_env(
                "ACCOMMODATION_IMAGE_SIZE",
                ACCOMMODATION_IMAGE_SIZE,
            )?,
            food_provider_image_size: preset_from_env(
                "FOOD_PROVIDER_IMAGE_SIZE",
                FOOD_PROVIDER_IMAGE_SIZE,
            )?,
            menu_item_image_size: preset_from_env("MENU_ITEM_IMAGE_SIZE", MENU_ITEM_IMAGE_SIZE)?,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_files_per_upload == 0 {
            return Err(anyhow::anyhow!("MAX_FILES_PER_UPLOAD must be greater than 0"));
        }
        if !(1..=100).contains(&self.image_quality) {
            return Err(anyhow::anyhow!("IMAGE_QUALITY must be between 1 and 100"));
        }
        if !self.images_url_prefix.starts_with('/') {
            return Err(anyhow::anyhow!("IMAGES_URL_PREFIX must start with '/'"));
        }
        Ok(())
    }
}

fn preset_from_env(var: &str, default: &str) -> Result<ImageDimensionsSpec, anyhow::Error> {
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    ImageDimensionsSpec::parse(&raw).map_err(|e| anyhow::anyhow!("{} is invalid: {}", var, e))
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub upload: UploadConfig,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            environment,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
        };

        Ok(Config {
            base,
            upload: UploadConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }
        if self.is_production() && self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long in production"
            ));
        }
        if self.base.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be greater than 0"));
        }
        self.upload.validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.base.request_timeout_secs
    }

    pub fn uploads_root_dir(&self) -> &PathBuf {
        &self.upload.uploads_root_dir
    }

    pub fn images_url_prefix(&self) -> &str {
        &self.upload.images_url_prefix
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.upload.max_file_size_bytes
    }

    pub fn max_files_per_upload(&self) -> usize {
        self.upload.max_files_per_upload
    }

    /// Largest multipart body accepted: every file at the size ceiling plus
    /// 1 MiB for multipart framing.
    pub fn max_request_body_bytes(&self) -> usize {
        let files = self.upload.max_files_per_upload as u64;
        (files * self.upload.max_file_size_bytes + 1024 * 1024) as usize
    }
}
