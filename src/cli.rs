use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{AlignmentMode, TrimmingMode};

#[derive(Parser)]
#[command(author, version, about = "Align sequences with MAFFT, trim with ClipKIT and infer a tree with IQ-TREE", long_about = None)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the user config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run alignment, trimming and tree inference in sequence
    Run {
        /// Input multi-FASTA file of nucleotide or amino acid sequences
        unaligned_seqs: PathBuf,
        /// Output directory
        output_dir: PathBuf,
        /// Mode for multiple sequence alignment
        #[arg(long, value_enum, default_value_t = AlignmentMode::Auto)]
        alignment_mode: AlignmentMode,
        /// ClipKIT trimming mode
        #[arg(long, value_enum, default_value_t = TrimmingMode::SmartGap)]
        trimming_mode: TrimmingMode,
        /// Gap threshold (ignored by smart-gap modes)
        #[arg(short = 'g', long, default_value = "0.9")]
        gap_threshold: f64,
        /// Number of UFBoot replicates
        #[arg(short = 'b', long, default_value = "1000")]
        ufboot_reps: u32,
        /// Prefix of all output files
        #[arg(short = 'p', long = "prefix", default_value = "seq_to_tree")]
        output_prefix: String,
        /// Local directory for intermediate files (overrides config)
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },

    /// Align sequences with MAFFT only
    Align {
        /// Input multi-FASTA file
        unaligned_seqs: PathBuf,
        #[arg(long, value_enum, default_value_t = AlignmentMode::Auto)]
        alignment_mode: AlignmentMode,
        #[arg(short = 'p', long = "prefix", default_value = "seq_to_tree")]
        output_prefix: String,
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },

    /// Trim an existing alignment with ClipKIT only
    Trim {
        /// Aligned FASTA file
        alignment: PathBuf,
        #[arg(long, value_enum, default_value_t = TrimmingMode::SmartGap)]
        trimming_mode: TrimmingMode,
        #[arg(short = 'g', long, default_value = "0.9")]
        gap_threshold: f64,
        #[arg(short = 'p', long = "prefix", default_value = "seq_to_tree")]
        output_prefix: String,
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },

    /// Infer a tree with IQ-TREE from a trimmed alignment and publish the results
    Infer {
        /// Trimmed alignment file
        trimmed_alignment: PathBuf,
        /// Output directory
        output_dir: PathBuf,
        #[arg(short = 'b', long, default_value = "1000")]
        ufboot_reps: u32,
        #[arg(short = 'p', long = "prefix", default_value = "seq_to_tree")]
        output_prefix: String,
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },

    /// Report whether the configured external tools can be started
    CheckTools,

    /// Write the default config file to the user config directory
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let args = Args::try_parse_from(["seq-to-tree", "run", "seqs.fa", "out"]).unwrap();
        match args.command {
            Commands::Run {
                alignment_mode,
                trimming_mode,
                gap_threshold,
                ufboot_reps,
                output_prefix,
                work_dir,
                ..
            } => {
                assert_eq!(alignment_mode, AlignmentMode::Auto);
                assert_eq!(trimming_mode, TrimmingMode::SmartGap);
                assert_eq!(gap_threshold, 0.9);
                assert_eq!(ufboot_reps, 1000);
                assert_eq!(output_prefix, "seq_to_tree");
                assert!(work_dir.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn run_accepts_modes() {
        let args = Args::try_parse_from([
            "seq-to-tree",
            "-vv",
            "run",
            "seqs.fa",
            "out",
            "--alignment-mode",
            "l-ins-i",
            "--trimming-mode",
            "kpic-gappy",
            "-g",
            "0.7",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        match args.command {
            Commands::Run {
                alignment_mode,
                trimming_mode,
                gap_threshold,
                ..
            } => {
                assert_eq!(alignment_mode, AlignmentMode::Linsi);
                assert_eq!(trimming_mode, TrimmingMode::KpicGappy);
                assert_eq!(gap_threshold, 0.7);
            }
            _ => panic!("expected run"),
        }
    }
}
