use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Abstraction for managing a demanda test project.
struct DemandaTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl DemandaTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("projeto");
        fs::create_dir_all(root.join("data"))?;

        fs::write(
            root.join("demanda.yaml"),
            r#"
name: demandas-teste
rules:
  vocabularies:
    - field: BANCO
      values: [BRADESCO, SANTANDER, ITAU]
  consistency:
    - start_field: DATA
      end_field: DATA RESOLUCAO
"#,
        )?;

        Ok(Self { _tmp: tmp, root })
    }

    fn write_input(&self, name: &str, content: &str) -> Result<()> {
        fs::write(self.root.join("data").join(name), content)?;
        Ok(())
    }

    fn demanda(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("demanda"));
        cmd.current_dir(&self.root);
        cmd
    }

    fn report(&self) -> Result<serde_json::Value> {
        let content = fs::read_to_string(self.root.join("output/report.json"))?;
        Ok(serde_json::from_str(&content)?)
    }
}

const SAMPLE: &str = "\
DATA,DATA RESOLUCAO,RESPONSAVEL,SITUACAO,BANCO,DIRETOR,VALOR
31/01/2025,05/02/2025,JULIO,ABERTA,BRADESCO,MARCOS,\"R$ 1.234,56\"
31/01/2025,05/02/2025,JULIO,ABERTA,BRADESCO,MARCOS,\"R$ 1.234,56\"
31/02/2025,,ANA,ABERTA,SANTANDEER,MARCOS,\"100,00\"
10/02/2025,01/02/2025,PEDRO,FECHADA,BANCO NOVO XYZ,MARCOS,\"50,00\"
";

#[test]
fn test_run_produces_cleaned_dataset_and_report() -> Result<()> {
    let env = DemandaTestEnv::new()?;
    env.write_input("demandas_2025-01.csv", SAMPLE)?;

    env.demanda()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));

    let cleaned = fs::read_to_string(env.root.join("output/demandas_2025-01_limpo.csv"))?;
    // Duplicate row dropped, verdict columns appended
    assert_eq!(cleaned.lines().count(), 4);
    assert!(cleaned.starts_with("DATA,DATA RESOLUCAO,"));
    assert!(cleaned.contains("STATUS,PROBLEMAS"));
    // Close variant auto-corrected
    assert!(cleaned.contains("SANTANDER"));
    assert!(!cleaned.contains("SANTANDEER"));

    let report = env.report()?;
    let table = &report["tables"]["demandas_2025-01"];
    assert_eq!(table["total_records"], 3);
    assert_eq!(table["duplicate_rows_removed"], 1);
    // Invalid calendar date -> critical
    assert!(table["status"]["critical"].as_u64().unwrap() >= 1);
    // Unknown bank ends up in the manual-review ledger
    assert_eq!(table["new_values"]["BANCO"][0], "BANCO NOVO XYZ");
    Ok(())
}

#[test]
fn test_run_fails_cleanly_on_missing_input() -> Result<()> {
    let env = DemandaTestEnv::new()?;

    env.demanda()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input found"));
    Ok(())
}

#[test]
fn test_run_single_file_input() -> Result<()> {
    let env = DemandaTestEnv::new()?;
    env.write_input("avulso.csv", SAMPLE)?;

    env.demanda()
        .arg("run")
        .arg("--input")
        .arg("data/avulso.csv")
        .assert()
        .success();

    assert!(env.root.join("output/avulso_limpo.csv").exists());
    Ok(())
}

#[test]
fn test_report_is_deterministic() -> Result<()> {
    let env = DemandaTestEnv::new()?;
    env.write_input("demandas_2025-01.csv", SAMPLE)?;

    env.demanda().arg("run").assert().success();
    let first = env.report()?["tables"].clone();

    env.demanda().arg("run").assert().success();
    let second = env.report()?["tables"].clone();

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_clean_removes_output() -> Result<()> {
    let env = DemandaTestEnv::new()?;
    env.write_input("demandas_2025-01.csv", SAMPLE)?;

    env.demanda().arg("run").assert().success();
    assert!(env.root.join("output").exists());

    env.demanda().arg("clean").assert().success();
    assert!(!env.root.join("output").exists());
    Ok(())
}

#[test]
fn test_inspect_shows_schema_and_rows() -> Result<()> {
    let env = DemandaTestEnv::new()?;
    env.write_input("demandas_2025-01.csv", SAMPLE)?;

    env.demanda()
        .arg("inspect")
        .arg("data/demandas_2025-01.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("VALOR"))
        .stdout(predicate::str::contains("Money"));
    Ok(())
}

#[test]
fn test_dashboard_debug_panel() -> Result<()> {
    let env = DemandaTestEnv::new()?;
    env.write_input(
        "demandas_2025-01.csv",
        "DATA,VALOR,EQUIPE\n05/01/2025,\"100,00\",NORTE\n10/02/2025,\"50,00\",SUL\n",
    )?;

    env.demanda()
        .arg("dashboard")
        .arg("data/demandas_2025-01.csv")
        .arg("--debug")
        .assert()
        .success()
        .stdout(predicate::str::contains("NORTE"))
        .stdout(predicate::str::contains("\"uptime\""))
        .stdout(predicate::str::contains("\"error_count\""))
        .stdout(predicate::str::contains("\"memory_usage\""))
        .stdout(predicate::str::contains("\"status\": \"COMPLETED\""));
    Ok(())
}

#[test]
fn test_dashboard_period_filter() -> Result<()> {
    let env = DemandaTestEnv::new()?;
    env.write_input(
        "demandas_2025-01.csv",
        "DATA,VALOR,EQUIPE\n05/01/2025,\"100,00\",NORTE\n10/02/2025,\"50,00\",SUL\n",
    )?;

    env.demanda()
        .arg("dashboard")
        .arg("data/demandas_2025-01.csv")
        .arg("--period")
        .arg("2025-01")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 record(s) after filters"));
    Ok(())
}

#[test]
fn test_output_path_env_override() -> Result<()> {
    let env = DemandaTestEnv::new()?;
    env.write_input("demandas_2025-01.csv", SAMPLE)?;

    env.demanda()
        .arg("run")
        .env("DEMANDA_OUTPUT_PATH", "saida_custom")
        .assert()
        .success();

    assert!(env.root.join("saida_custom/report.json").exists());
    assert!(
        env.root
            .join("saida_custom/demandas_2025-01_limpo.csv")
            .exists()
    );
    assert!(!env.root.join("output").exists());
    Ok(())
}

#[test]
fn test_strict_mode_aborts_on_broken_table() -> Result<()> {
    let env = DemandaTestEnv::new()?;
    env.write_input("ok.csv", SAMPLE)?;
    // Headerless file: cleaning rejects it
    env.write_input("vazio.csv", "")?;

    env.demanda()
        .arg("run")
        .env("DEMANDA_STRICT", "1")
        .assert()
        .failure();
    Ok(())
}
