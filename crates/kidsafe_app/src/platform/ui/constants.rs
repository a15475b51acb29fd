pub const PROMPT: &str = "> ";

pub const BANNER: &str = "KidSafe product analyzer. Type `help` for commands.";

pub const HELP: &str = "\
Commands:
  list                 show the catalog (* = instant analysis available)
  select <brand|#>     analyze a catalog product
  clear                clear the current selection
  search <name>        look a product up by name
  ingredients <text>   set ingredients for manual analysis
  analyze              analyze the manually entered ingredients
  ask <question>       ask about the analyzed product
  help                 show this help
  quit                 exit";

pub const MANUAL_HINT: &str =
    "Enter the ingredients with `ingredients <text>`, then run `analyze`.";

pub const CATALOG_LOADING: &str = "Loading database...";

pub const CATALOG_EMPTY: &str = "The catalog is empty.";

pub const LOOKUP_BUSY: &str = "A lookup is already running. Please wait for it to finish.";

pub const CHAT_BUSY: &str = "Still waiting for the previous answer.";

pub const ASK_NEEDS_RESULT: &str = "Select or search for a product before asking questions.";

pub const ASK_NEEDS_QUESTION: &str = "Type a question after `ask`.";

pub const MANUAL_NOT_ACTIVE: &str =
    "Manual analysis opens after a search finds no ingredients. Try `search <name>` first.";
