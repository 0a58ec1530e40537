use bookshelf::commands::filter::{Bounds, FilterCriteria};
use bookshelf::commands::register::ManualEntry;
use bookshelf::dates;
use bookshelf::model::{BookField, BookId};
use chrono::NaiveDate;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bookshelf",
    bin_name = "bookshelf",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Browse, edit and register books in your catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server base URL for this run (overrides config)
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub server: Option<String>,

    /// Verbose output (-vv for debug)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Browse,
    Edit,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Browse => "Browse Commands:",
            CommandGroup::Edit => "Edit Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "list" | "search" => Some(CommandGroup::Browse),
            "edit" | "register" => Some(CommandGroup::Edit),
            "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[CommandGroup::Browse, CommandGroup::Edit, CommandGroup::Misc]
    }
}

/// Returns the custom grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("bookshelf {version}\n"));
    output.push_str("Browse, edit and register books in your catalog\n");
    output.push('\n');
    output.push_str("Usage: bookshelf [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --server <URL>  Server base URL for this run (overrides config)\n");
    output.push_str("  -v, --verbose       Verbose output (-vv for debug)\n");
    output.push_str("  -h, --help          Print help\n");
    output.push_str("  -V, --version       Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a specific subcommand using clap's built-in rendering
pub fn print_subcommand_help(command: &Option<Commands>) {
    let name = match command {
        Some(Commands::Browse(c)) => match c {
            BrowseCommands::List { .. } => "list",
            BrowseCommands::Search { .. } => "search",
        },
        Some(Commands::Edit(c)) => match c {
            EditCommands::Edit { .. } => "edit",
            EditCommands::Register { .. } => "register",
        },
        Some(Commands::Misc(c)) => match c {
            MiscCommands::Config { .. } => "config",
            MiscCommands::Help { .. } => "help",
        },
        None => {
            print_grouped_help();
            return;
        }
    };

    print_help_for_command(name);
}

pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            let help = subcmd.render_help();
            print!("{}", help);
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Browse(BrowseCommands),

    #[command(flatten)]
    Edit(EditCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum BrowseCommands {
    /// List books, optionally filtered and sorted
    #[command(alias = "ls", display_order = 1)]
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Column to sort by; repeat to flip direction (e.g. --sort pages --sort pages)
        #[arg(long = "sort", value_name = "FIELD", value_parser = parse_field)]
        sort: Vec<BookField>,
    },

    /// Find books whose title or ISBN contains TERM
    #[command(display_order = 2)]
    Search {
        term: String,

        /// Column to sort by; repeat to flip direction
        #[arg(long = "sort", value_name = "FIELD", value_parser = parse_field)]
        sort: Vec<BookField>,
    },
}

#[derive(Subcommand, Debug)]
pub enum EditCommands {
    /// Change or delete books, then save the whole catalog
    #[command(alias = "e", display_order = 10)]
    Edit {
        /// Field change, as ID:FIELD=VALUE (e.g. 2:title=Run or 5:pages=)
        #[arg(long = "set", value_name = "ID:FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<FieldAssignment>,

        /// Id of a book to delete
        #[arg(long = "delete", value_name = "ID", value_parser = parse_book_id)]
        delete: Vec<BookId>,
    },

    /// Register new books by ISBN or by hand
    #[command(alias = "reg", display_order = 11)]
    Register {
        #[command(subcommand)]
        mode: RegisterMode,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegisterMode {
    /// Register up to 10 books by ISBN
    Isbn {
        /// ISBNs to look up and register
        isbns: Vec<String>,
    },

    /// Register a single book from typed-in details
    Manual(ManualArgs),
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (server-url, load-path, save-path, register-path, timeout)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for bookshelf or a subcommand
    #[command(display_order = 31)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Title contains
    #[arg(long)]
    pub title: Option<String>,

    /// Author contains
    #[arg(long)]
    pub author: Option<String>,

    /// Publisher contains
    #[arg(long)]
    pub publisher: Option<String>,

    /// Shelf contains
    #[arg(long)]
    pub shelf: Option<String>,

    /// ISBN contains
    #[arg(long)]
    pub isbn: Option<String>,

    /// Earliest publication year (YYYY or YYYY-MM)
    #[arg(long, value_name = "YEAR", value_parser = parse_year)]
    pub year_min: Option<i32>,

    /// Latest publication year (YYYY or YYYY-MM)
    #[arg(long, value_name = "YEAR", value_parser = parse_year)]
    pub year_max: Option<i32>,

    /// Fewest pages
    #[arg(long, value_name = "N")]
    pub pages_min: Option<u32>,

    /// Most pages
    #[arg(long, value_name = "N")]
    pub pages_max: Option<u32>,

    /// Registered on or after (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub added_min: Option<String>,

    /// Registered on or before (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub added_max: Option<String>,
}

impl FilterArgs {
    pub fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            publisher: self.publisher.unwrap_or_default(),
            shelf: self.shelf.unwrap_or_default(),
            isbn: self.isbn.unwrap_or_default(),
            year: Bounds::new(self.year_min, self.year_max),
            pages: Bounds::new(self.pages_min, self.pages_max),
            added: Bounds::new(self.added_min, self.added_max),
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct ManualArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub publisher: Option<String>,

    #[arg(long)]
    pub shelf: Option<String>,

    /// Publication year (YYYY)
    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub pages: Option<String>,

    #[arg(long)]
    pub isbn: Option<String>,

    /// Registered date (YYYY-MM-DD)
    #[arg(long)]
    pub added: Option<String>,
}

impl ManualArgs {
    /// Validation happens in the library so other clients get the same rules.
    pub fn into_entry(self) -> ManualEntry {
        ManualEntry {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            publisher: self.publisher.unwrap_or_default(),
            shelf: self.shelf.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            pages: self.pages.unwrap_or_default(),
            isbn: self.isbn.unwrap_or_default(),
            added: self.added.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub id: BookId,
    pub field: BookField,
    pub value: String,
}

fn parse_field(s: &str) -> Result<BookField, String> {
    s.parse()
}

fn parse_book_id(s: &str) -> Result<BookId, String> {
    s.parse()
}

fn parse_year(s: &str) -> Result<i32, String> {
    dates::parse_year_bound(s).ok_or_else(|| format!("expected YYYY or YYYY-MM, got '{}'", s))
}

fn parse_date(s: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("expected YYYY-MM-DD, got '{}'", s))
}

/// Parses `ID:FIELD=VALUE`. The value may be empty and may itself contain `:` or `=`.
fn parse_assignment(s: &str) -> Result<FieldAssignment, String> {
    let (id, rest) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ID:FIELD=VALUE, got '{}'", s))?;
    let (field, value) = rest
        .split_once('=')
        .ok_or_else(|| format!("expected ID:FIELD=VALUE, got '{}'", s))?;

    Ok(FieldAssignment {
        id: id.parse()?,
        field: field.parse()?,
        value: value.to_string(),
    })
}
