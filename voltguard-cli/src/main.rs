//! VoltGuard CLI - circuit analysis and safety assessment from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use voltguard::{
    load_circuit, ComplianceStatus, HazardSeverity, IssueSeverity, RiskLevel, SafetyReport,
    SafetyStandards, VoltGuardCore,
};

#[derive(Parser)]
#[command(name = "voltguard")]
#[command(about = "Electrical circuit analysis and safety assessment tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a circuit JSON file and assess its safety
    Check {
        /// Path to a circuit JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if the risk level is this or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnRisk>,
    },

    /// List the active safety-standard thresholds
    Standards,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum FailOnRisk {
    Critical,
    High,
    Medium,
    Low,
}

impl FailOnRisk {
    fn threshold(self) -> RiskLevel {
        match self {
            FailOnRisk::Critical => RiskLevel::Critical,
            FailOnRisk::High => RiskLevel::High,
            FailOnRisk::Medium => RiskLevel::Medium,
            FailOnRisk::Low => RiskLevel::Low,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check {
            file,
            format,
            fail_on,
        } => handle_check(&file, format, fail_on),
        Commands::Standards => {
            handle_standards();
            0
        }
    };

    process::exit(exit_code);
}

fn handle_check(file: &PathBuf, format: OutputFormat, fail_on: Option<FailOnRisk>) -> i32 {
    let circuit = match load_circuit(file) {
        Ok(circuit) => circuit,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let report = VoltGuardCore::evaluate(&circuit);
    match format {
        OutputFormat::Human => output_human(&circuit.name, &report),
        OutputFormat::Json => output_json(&report),
    }

    if let Some(fail_on) = fail_on {
        if report.assessment.risk_level >= fail_on.threshold() {
            return 1;
        }
    }
    0
}

fn severity_tag(severity: HazardSeverity) -> &'static str {
    match severity {
        HazardSeverity::Critical => "CRITICAL",
        HazardSeverity::High => "HIGH",
        HazardSeverity::Medium => "MEDIUM",
        HazardSeverity::Low => "LOW",
    }
}

fn status_tag(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Compliant => "compliant",
        ComplianceStatus::Warning => "warning",
        ComplianceStatus::NonCompliant => "NON-COMPLIANT",
    }
}

fn output_human(name: &str, report: &SafetyReport) {
    println!("\nCircuit: {}", name);
    println!("{}", "─".repeat(60));

    println!(
        "  Total power: {:.1} W   Total current: {:.2} A   Efficiency: {:.0}%",
        report.analysis.total_power, report.analysis.total_current, report.analysis.efficiency
    );
    println!(
        "  Safety score: {:.0}/100   Risk level: {:?}",
        report.assessment.safety_score, report.assessment.risk_level
    );
    if let Some(worst) = report.assessment.worst_hazard() {
        println!(
            "  Hazards: {} (worst: {})",
            report.assessment.hazards.len(),
            severity_tag(worst)
        );
    }
    let non_compliant = report.assessment.non_compliant_count();
    if non_compliant > 0 {
        println!("  Non-compliant standards: {}", non_compliant);
    }
    if report.analysis.has_critical_issue() {
        println!("  Critical electrical issues present; see below");
    }

    if !report.analysis.issues.is_empty() {
        println!("\n  Issues:");
        for issue in &report.analysis.issues {
            let tag = match issue.severity {
                IssueSeverity::Critical => "CRITICAL",
                IssueSeverity::Warning => "warning",
                IssueSeverity::Info => "info",
            };
            println!("    [{}] {}", tag, issue.message);
        }
    }

    if !report.assessment.hazards.is_empty() {
        println!("\n  Hazards:");
        for hazard in &report.assessment.hazards {
            println!("    [{}] {}", severity_tag(hazard.severity), hazard.description);
            println!("      Mitigation: {}", hazard.mitigation);
        }
    }

    println!("\n  Compliance:");
    for check in &report.assessment.compliance {
        println!(
            "    {} ({}): {}",
            check.standard.label(),
            status_tag(check.status),
            check.description
        );
    }

    if !report.assessment.recommendations.is_empty() {
        println!("\n  Recommendations:");
        for recommendation in &report.assessment.recommendations {
            println!("    - {}", recommendation);
        }
    }
}

fn output_json(report: &SafetyReport) {
    println!("{}", serde_json::to_string_pretty(report).unwrap());
}

fn handle_standards() {
    let standards = SafetyStandards::default();
    println!("Active safety-standard thresholds:\n");
    println!("  NEC");
    println!("    Maximum system voltage:   {:.0} V", standards.nec_max_voltage);
    println!("    Maximum feeder current:   {:.0} A", standards.nec_max_current);
    println!("  OSHA");
    println!("    Touch-voltage ceiling:    {:.0} V", standards.osha_touch_voltage);
    println!("  NFPA 70E");
    println!(
        "    Incident-energy limit:    {:.1} cal/cm²",
        standards.nfpa_incident_energy
    );
    println!(
        "    Working distance:         {:.2} cm",
        standards.working_distance_cm
    );
    println!("  Engine heuristics");
    println!(
        "    Ground-fault trip:        {:.0} mA across {:.0} Ω",
        standards.ground_fault_trip_a * 1000.0,
        standards.ground_fault_path_ohms
    );
    println!(
        "    Short-circuit floor:      {:.0} A ({:.0} A below {:.0} V), {:.0}x voltage",
        standards.short_circuit_floor_a,
        standards.short_circuit_lv_floor_a,
        standards.osha_touch_voltage,
        standards.short_circuit_voltage_ratio
    );
    println!(
        "    Arc-fault estimate:       {:.0}x load current, capped at {:.0} A",
        standards.arc_fault_multiplier, standards.arc_fault_cap_a
    );
}
