//! Interface de terminal do checkpoint: spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`BatchProgress`] acompanha visualmente
//! a emissão de QR codes no terminal.

use std::path::Path;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::checkin::RosterSummary;

/// Indicador visual de progresso para um lote de QR codes.
///
/// Exibe um spinner animado durante a renderização e mensagens
/// coloridas para sucesso (verde) e falha (vermelho).
pub struct BatchProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para mensagens de sucesso.
    green: Style,
    // Estilo vermelho para mensagens de falha.
    red: Style,
}

impl BatchProgress {
    /// Inicia o spinner com a descrição do lote.
    pub fn start(label: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(label.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    /// Finaliza o spinner com a mensagem de sucesso.
    pub fn complete(&self, message: &str) {
        self.pb.finish_and_clear();
        println!("  {} {message}", self.green.apply_to("✓"));
    }

    /// Finaliza o spinner com a mensagem de falha.
    pub fn fail(&self, message: &str) {
        self.pb.finish_and_clear();
        println!("  {} {message}", self.red.apply_to("✗"));
    }
}

/// Imprime o resumo de presença e almoço de forma legível.
pub fn print_summary(summary: &RosterSummary, data_file: &Path) {
    let heading = Style::new().bold();
    let green = Style::new().green();
    let yellow = Style::new().yellow();
    let dim = Style::new().dim();

    println!("{}", heading.apply_to(format!("─── {} ───", data_file.display())));
    println!("  Attendees      {}", summary.total);
    println!("  Paid           {}", summary.paid);
    println!("  Inside         {}", green.apply_to(summary.inside));
    println!("  Outside        {}", yellow.apply_to(summary.outside));
    println!("  Not scanned    {}", dim.apply_to(summary.not_scanned));
    println!(
        "  Lunch claimed  {}/{}",
        green.apply_to(summary.lunch_claimed),
        summary.lunch_issued
    );
}
