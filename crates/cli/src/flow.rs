use crate::prompt::{is_yes, Prompt};
use anyhow::Result;
use clap::ValueEnum;
use seqrename_core::{
    apply_plan, generate_plan, ApplyResult, FileOutcome, MetadataProbe, PlanOptions,
    RenameMode, RenamePlan, SUPPORTED_EXTENSIONS,
};
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub dir: Option<PathBuf>,
    pub mode: RenameMode,
    pub assume_yes: bool,
    pub dry_run: bool,
    pub output: OutputFormat,
}

#[derive(Debug)]
pub enum Outcome {
    MissingDirectory,
    NoImages,
    DryRun,
    Cancelled,
    Completed(ApplyResult),
}

/// `out` receives the payload (plan, per-file results); `status` receives
/// instructions, warnings and the summary. With JSON output the caller
/// points `status` somewhere other than stdout.
pub fn run<P: Prompt, W: Write, S: Write>(
    settings: &RunSettings,
    prompt: &mut P,
    out: &mut W,
    status: &mut S,
    probe: &dyn MetadataProbe,
) -> Result<Outcome> {
    let dir = match &settings.dir {
        Some(dir) => {
            let dir = std::path::absolute(dir)?;
            writeln!(status, "Target directory: {}", dir.display())?;
            dir
        }
        None => ask_directory(prompt, status)?,
    };

    if !dir.exists() {
        log::debug!("directory not found: {}", dir.display());
        writeln!(status, "Error: Directory '{}' does not exist!", dir.display())?;
        return Ok(Outcome::MissingDirectory);
    }

    if settings.mode.needs_metadata() && !probe.is_available() {
        writeln!(
            status,
            "Warning: image decoding is not available in this build; \
             {{width}}, {{height}}, {{resolution}}, {{format}} and {{camera}} will be empty."
        )?;
    }

    let options = PlanOptions {
        input_dir: dir.clone(),
        mode: settings.mode.clone(),
    };
    let plan = generate_plan(&options, probe)?;
    if plan.candidates.is_empty() {
        writeln!(status, "No image files found in '{}'", dir.display())?;
        return Ok(Outcome::NoImages);
    }

    writeln!(status, "Found {} image files to rename", plan.total_files)?;
    writeln!(
        status,
        "This will rename all image files to: {}",
        plan.mode.describe()
    )?;
    if plan.mode == RenameMode::Sequential && plan.stats.extension_rewrites > 0 {
        writeln!(
            status,
            "Warning: {} file(s) are not JPEG but will be given a .jpg name. \
             Only the name changes; the image data is not converted.",
            plan.stats.extension_rewrites
        )?;
    }

    if settings.dry_run {
        print_plan(out, status, &plan, settings.output)?;
        return Ok(Outcome::DryRun);
    }

    if !settings.assume_yes {
        let answer = prompt.ask("Do you want to continue? (y/N)")?;
        if !is_yes(&answer) {
            writeln!(status, "Operation cancelled.")?;
            return Ok(Outcome::Cancelled);
        }
    }

    let result = apply_plan(&plan);
    print_outcomes(out, status, &result, settings.output)?;
    Ok(Outcome::Completed(result))
}

fn ask_directory<P: Prompt, S: Write>(prompt: &mut P, status: &mut S) -> Result<PathBuf> {
    writeln!(
        status,
        "Image File Renamer - renames images ({}) in one folder to 001.jpg, 002.jpg, 003.jpg, ...",
        SUPPORTED_EXTENSIONS.join(", ")
    )?;
    writeln!(status)?;
    writeln!(status, "Examples of paths you can use:")?;
    writeln!(status, "  ./images                 (images folder in current directory)")?;
    writeln!(status, "  ../photos                (photos folder in parent directory)")?;
    writeln!(status, "  C:\\Users\\Name\\Pictures   (absolute Windows path)")?;
    writeln!(status, "  /home/user/pics          (absolute Linux/Mac path)")?;
    status.flush()?;

    let answer = prompt.ask("Enter the path to your images folder")?;
    if answer.is_empty() {
        let cwd = env::current_dir()?;
        writeln!(status, "Using current directory: {}", cwd.display())?;
        Ok(cwd)
    } else {
        let dir = std::path::absolute(&answer)?;
        writeln!(status, "Target directory: {}", dir.display())?;
        Ok(dir)
    }
}

fn print_plan<W: Write, S: Write>(
    out: &mut W,
    status: &mut S,
    plan: &RenamePlan,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(plan)?)?;
        }
        OutputFormat::Table => {
            writeln!(out, "original -> new")?;
            for candidate in &plan.candidates {
                writeln!(
                    out,
                    "{} -> {}{}",
                    display_name(&candidate.original_path),
                    display_name(&candidate.target_path),
                    if candidate.changed { "" } else { " (unchanged)" }
                )?;
            }
            writeln!(
                out,
                "\nstats: scanned={} images={} non_image_skip={} planned={} unchanged={}",
                plan.stats.scanned_entries,
                plan.stats.image_files,
                plan.stats.skipped_non_image,
                plan.stats.planned,
                plan.stats.unchanged
            )?;
        }
    }
    writeln!(status, "dry run: no files were changed.")?;
    Ok(())
}

fn print_outcomes<W: Write, S: Write>(
    out: &mut W,
    status: &mut S,
    result: &ApplyResult,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
        }
        OutputFormat::Table => {
            for outcome in &result.outcomes {
                match outcome {
                    FileOutcome::Renamed { from, to } => writeln!(
                        out,
                        "Renamed: {} -> {}",
                        display_name(from),
                        display_name(to)
                    )?,
                    FileOutcome::Unchanged { path } => writeln!(
                        out,
                        "Skipped: {} (already has correct name)",
                        display_name(path)
                    )?,
                    FileOutcome::Failed { from, error, .. } => {
                        writeln!(out, "Error renaming {}: {}", display_name(from), error)?
                    }
                }
            }
        }
    }

    writeln!(status, "\nSummary:")?;
    writeln!(status, "Renamed: {} files", result.renamed)?;
    writeln!(status, "Skipped: {} files", result.skipped)?;
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::{run, Outcome, OutputFormat, RunSettings};
    use crate::prompt::{LinePrompt, Prompt};
    use anyhow::Result;
    use seqrename_core::{NoMetadata, RenameMode};
    use std::collections::VecDeque;
    use std::fs;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    struct ScriptedPrompt {
        answers: VecDeque<String>,
        asked: Vec<String>,
    }

    impl ScriptedPrompt {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn ask(&mut self, question: &str) -> Result<String> {
            self.asked.push(question.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("unexpected question: {question}"))
        }
    }

    fn settings(dir: Option<PathBuf>) -> RunSettings {
        RunSettings {
            dir,
            mode: RenameMode::Sequential,
            assume_yes: false,
            dry_run: false,
            output: OutputFormat::Table,
        }
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name.as_bytes()).expect("write fixture");
    }

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("read dir")
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn typed_directory_and_yes_renames_files() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "b.jpg");
        touch(temp.path(), "a.png");

        let dir = temp.path().display().to_string();
        let mut prompt = ScriptedPrompt::new(&[&dir, "YES"]);
        let (mut out, mut status) = (Vec::<u8>::new(), Vec::<u8>::new());
        let outcome = run(&settings(None), &mut prompt, &mut out, &mut status, &NoMetadata)
            .expect("run");

        let Outcome::Completed(result) = outcome else {
            panic!("expected completed run");
        };
        assert_eq!(result.renamed, 2);
        assert_eq!(names_in(temp.path()), vec!["001.jpg", "002.jpg"]);

        let out = text(out);
        let status = text(status);
        assert!(status.contains("Found 2 image files to rename"));
        assert!(status.contains("Warning: 1 file(s) are not JPEG"));
        assert!(out.contains("Renamed: a.png -> 001.jpg"));
        assert!(status.contains("Renamed: 2 files"));
        assert!(status.contains("Skipped: 0 files"));
        assert_eq!(prompt.asked.len(), 2);
    }

    #[test]
    fn piped_answers_drive_the_whole_flow() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "b.jpg");
        touch(temp.path(), "a.png");

        let input = format!("{}\ny\n", temp.path().display());
        let mut echo = Vec::new();
        let mut prompt = LinePrompt::new(Cursor::new(input), &mut echo);
        let (mut out, mut status) = (Vec::<u8>::new(), Vec::<u8>::new());
        let outcome = run(&settings(None), &mut prompt, &mut out, &mut status, &NoMetadata)
            .expect("run");
        drop(prompt);

        assert!(matches!(outcome, Outcome::Completed(ref r) if r.renamed == 2));
        assert_eq!(names_in(temp.path()), vec!["001.jpg", "002.jpg"]);
        let echo = text(echo);
        assert!(echo.contains("Enter the path to your images folder: "));
        assert!(echo.contains("Do you want to continue? (y/N): "));
    }

    #[test]
    fn anything_but_yes_cancels_without_changes() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "x.jpg");

        let mut prompt = ScriptedPrompt::new(&["nope"]);
        let (mut out, mut status) = (Vec::<u8>::new(), Vec::<u8>::new());
        let outcome = run(
            &settings(Some(temp.path().to_path_buf())),
            &mut prompt,
            &mut out,
            &mut status,
            &NoMetadata,
        )
        .expect("run");

        assert!(matches!(outcome, Outcome::Cancelled));
        assert_eq!(names_in(temp.path()), vec!["x.jpg"]);
        assert!(text(status).contains("Operation cancelled."));
        assert!(out.is_empty());
    }

    #[test]
    fn missing_directory_is_reported_and_touches_nothing() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "keep.jpg");
        let missing = temp.path().join("missing");

        let mut prompt = ScriptedPrompt::new(&[]);
        let (mut out, mut status) = (Vec::<u8>::new(), Vec::<u8>::new());
        let outcome = run(
            &settings(Some(missing.clone())),
            &mut prompt,
            &mut out,
            &mut status,
            &NoMetadata,
        )
        .expect("missing directory ends the run normally");

        assert!(matches!(outcome, Outcome::MissingDirectory));
        assert!(text(status).contains(&format!(
            "Error: Directory '{}' does not exist!",
            missing.display()
        )));
        assert!(prompt.asked.is_empty());
        assert_eq!(names_in(temp.path()), vec!["keep.jpg"]);
    }

    #[test]
    fn empty_directory_reports_no_images() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "notes.txt");

        let mut prompt = ScriptedPrompt::new(&[]);
        let (mut out, mut status) = (Vec::<u8>::new(), Vec::<u8>::new());
        let outcome = run(
            &settings(Some(temp.path().to_path_buf())),
            &mut prompt,
            &mut out,
            &mut status,
            &NoMetadata,
        )
        .expect("run");

        assert!(matches!(outcome, Outcome::NoImages));
        assert!(text(status).contains("No image files found"));
    }

    #[test]
    fn dry_run_prints_plan_without_asking() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "cat.jpg");

        let mut run_settings = settings(Some(temp.path().to_path_buf()));
        run_settings.dry_run = true;
        run_settings.output = OutputFormat::Json;
        run_settings.mode = RenameMode::Pattern("{original}_{counter}".to_string());

        let mut prompt = ScriptedPrompt::new(&[]);
        let (mut out, mut status) = (Vec::<u8>::new(), Vec::<u8>::new());
        let outcome = run(&run_settings, &mut prompt, &mut out, &mut status, &NoMetadata)
            .expect("run");

        assert!(matches!(outcome, Outcome::DryRun));
        assert_eq!(names_in(temp.path()), vec!["cat.jpg"]);

        let plan: serde_json::Value =
            serde_json::from_str(&text(out)).expect("stdout is a single JSON document");
        assert_eq!(plan["total_files"], 1);
        let target = plan["candidates"][0]["target_path"]
            .as_str()
            .expect("target path");
        assert!(target.ends_with("cat_001.jpg"));

        let status = text(status);
        assert!(status.contains("Found 1 image files to rename"));
        assert!(!status.contains("Warning:"));
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn json_apply_writes_outcomes_as_json() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "001.jpg");
        touch(temp.path(), "b.jpg");

        let mut run_settings = settings(Some(temp.path().to_path_buf()));
        run_settings.assume_yes = true;
        run_settings.output = OutputFormat::Json;

        let mut prompt = ScriptedPrompt::new(&[]);
        let (mut out, mut status) = (Vec::<u8>::new(), Vec::<u8>::new());
        run(&run_settings, &mut prompt, &mut out, &mut status, &NoMetadata).expect("run");

        let result: serde_json::Value =
            serde_json::from_str(&text(out)).expect("stdout is a single JSON document");
        assert_eq!(result["renamed"], 1);
        assert_eq!(result["skipped"], 1);
        assert!(text(status).contains("Summary:"));
    }

    #[test]
    fn metadata_pattern_without_decoding_warns() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "a.jpg");

        let mut run_settings = settings(Some(temp.path().to_path_buf()));
        run_settings.dry_run = true;
        run_settings.mode = RenameMode::Pattern("{original}_{width}".to_string());

        let mut prompt = ScriptedPrompt::new(&[]);
        let (mut out, mut status) = (Vec::<u8>::new(), Vec::<u8>::new());
        run(&run_settings, &mut prompt, &mut out, &mut status, &NoMetadata).expect("run");
        assert!(text(status).contains("image decoding is not available"));

        run_settings.mode = RenameMode::Pattern("{original}_{counter}".to_string());
        let mut status = Vec::new();
        run(&run_settings, &mut prompt, &mut Vec::<u8>::new(), &mut status, &NoMetadata)
            .expect("run");
        assert!(!text(status).contains("image decoding is not available"));
    }

    #[test]
    fn assume_yes_skips_confirmation_and_reports_skips() {
        let temp = tempdir().expect("tempdir");
        touch(temp.path(), "001.jpg");
        touch(temp.path(), "b.jpg");

        let mut run_settings = settings(Some(temp.path().to_path_buf()));
        run_settings.assume_yes = true;

        let mut prompt = ScriptedPrompt::new(&[]);
        let (mut out, mut status) = (Vec::<u8>::new(), Vec::<u8>::new());
        let outcome = run(&run_settings, &mut prompt, &mut out, &mut status, &NoMetadata)
            .expect("run");

        let Outcome::Completed(result) = outcome else {
            panic!("expected completed run");
        };
        assert_eq!((result.renamed, result.skipped), (1, 1));
        assert!(text(out).contains("Skipped: 001.jpg (already has correct name)"));
    }
}
