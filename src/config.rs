//! Configuração do checkpoint carregada a partir de `checkpoint.toml`.
//!
//! A struct [`CheckpointConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! Variáveis de ambiente (`BASE_URL`, `PORT`, `HOST`, `CHECKPOINT_*`) têm
//! precedência sobre o arquivo.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::Deserialize;

use crate::auth::Credentials;
use crate::error::CheckpointError;

/// Configuração de nível superior carregada de `checkpoint.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckpointConfig {
    /// Endereço de bind do servidor HTTP.
    #[serde(default = "default_host")]
    pub host: String,

    /// Porta do servidor HTTP.
    #[serde(default = "default_port")]
    pub port: u16,

    /// URL pública usada nos QR codes. Sem ela, o host da requisição é usado.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Habilita logs detalhados.
    #[serde(default)]
    pub debug: bool,

    /// Arquivo JSON com a lista de participantes.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Diretório servido em `/static`, onde as imagens QR são gravadas.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Usuário do administrador. Vazio desabilita o login.
    #[serde(default)]
    pub admin_username: String,

    /// Senha do administrador. Vazia desabilita o login.
    #[serde(default)]
    pub admin_password: String,

    /// Duração de uma sessão de administrador, em minutos.
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_data_file() -> PathBuf {
    PathBuf::from("attendees.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

// Doze horas: um dia de evento.
fn default_session_ttl_minutes() -> i64 {
    720
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            debug: false,
            data_file: default_data_file(),
            static_dir: default_static_dir(),
            admin_username: String::new(),
            admin_password: String::new(),
            session_ttl_minutes: default_session_ttl_minutes(),
        }
    }
}

impl CheckpointConfig {
    /// Carrega a configuração do arquivo indicado e aplica o ambiente do processo.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load(path: &Path) -> Result<Self, CheckpointError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<CheckpointConfig>(&contents)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.session_ttl()?;
        Ok(config)
    }

    /// Sobrescreve campos com as variáveis de ambiente não vazias.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), CheckpointError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(port) = var("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| CheckpointError::Config(format!("invalid PORT {port:?}: {e}")))?;
        }
        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(flag) = var("CHECKPOINT_DEBUG") {
            self.debug = parse_flag(&flag);
        }
        if let Some(path) = var("CHECKPOINT_DATA_FILE") {
            self.data_file = PathBuf::from(path);
        }
        if let Some(path) = var("CHECKPOINT_STATIC_DIR") {
            self.static_dir = PathBuf::from(path);
        }
        if let Some(username) = var("CHECKPOINT_ADMIN_USERNAME") {
            self.admin_username = username;
        }
        if let Some(password) = var("CHECKPOINT_ADMIN_PASSWORD") {
            self.admin_password = password;
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL base para QR codes emitidos fora de uma requisição HTTP (CLI).
    pub fn local_base_url(&self) -> String {
        if let Some(url) = &self.base_url {
            return url.trim_end_matches('/').to_string();
        }
        let host = if self.host == "0.0.0.0" { "localhost" } else { self.host.as_str() };
        format!("http://{host}:{}", self.port)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.admin_username.clone(), self.admin_password.clone())
    }

    /// Duração da sessão; valores menores que um minuto viram um minuto.
    pub fn session_ttl(&self) -> Result<TimeDelta, CheckpointError> {
        TimeDelta::try_minutes(self.session_ttl_minutes.max(1)).ok_or_else(|| {
            CheckpointError::Config(format!(
                "session_ttl_minutes out of range: {}",
                self.session_ttl_minutes
            ))
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}
