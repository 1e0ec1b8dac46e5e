//! Interface de linha de comando do checkpoint baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (serve, roster,
//! issue-qr, issue-lunch-qr, status) e flags globais (--config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// checkpoint: check-in de eventos e vales de almoço com QR codes.
#[derive(Debug, Parser)]
#[command(name = "checkpoint", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração TOML.
    #[arg(long, global = true, default_value = "checkpoint.toml")]
    pub config: PathBuf,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inicia o servidor HTTP.
    Serve,

    /// Gera uma lista aleatória de participantes no arquivo de dados.
    Roster {
        /// Quantidade de participantes.
        #[arg(long, default_value_t = 30)]
        count: u32,

        /// Sobrescreve o arquivo de dados se ele já existir.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Emite os QR codes de entrada para participantes pagantes.
    IssueQr,

    /// Emite os QR codes de almoço e grava os lunch tokens.
    IssueLunchQr,

    /// Mostra o resumo de presença e almoço.
    Status,
}
