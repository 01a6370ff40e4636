//! Lua harness for executing generated fragments.
//!
//! Mocks just enough of the game runtime for the generated code to run:
//! cards with suits, the evaluation context, `G.GAME` counters and the
//! SMODS helpers the effects call. Events run immediately.

#![allow(dead_code)]

use joker_forge::ConfigVariable;
use mlua::{FromLua, Lua};

const PRELUDE: &str = r#"
Card = {}
Card.__index = Card

function Card:is_suit(suit, bypass_debuff, flush_calc)
    if self.debuff and not bypass_debuff then
        return
    end
    return self.base.suit == suit
end

function Card:set_cost()
    self.cost = self.base_cost
end

function make_card(suit, set)
    local c = setmetatable({base = {suit = suit}, ability = {set = set or "Default"}, base_cost = 10}, Card)
    c:set_cost()
    return c
end

G = {
    GAME = {
        round_resets = {hands = 4},
        current_round = {hands_left = 4, discards_left = 3},
        blind = {chips = 300, chip_text = "300"},
        joker_buffer = 0,
        dollars = 0,
    },
    C = {GREEN = "green", RED = "red", BLUE = "blue"},
    jokers = {cards = {}, config = {card_limit = 5}},
    consumeables = {cards = {}},
    HUD_blind = {recalculate = function(self) end},
    E_MANAGER = {add_event = function(self, event) event.func() end},
    I = {CARD = {}},
}

messages = {}
created = {}
free_rerolls = 0
held = {}

function Event(t) return t end
function localize(key) return key end
function number_format(n) return tostring(n) end
function pseudoseed(seed) return seed end
function pseudorandom(seed, min, max) return min end
function pseudorandom_element(t, seed) return t[1] end
function ease_hands_played(n) G.GAME.current_round.hands_left = G.GAME.current_round.hands_left + n end
function card_eval_status_text(card, kind, a, b, c, extra)
    table.insert(messages, extra.message)
end

SMODS = {}
function SMODS.add_card(spec)
    local joker = {spec = spec, editions = {}, stickers = {}}
    function joker:set_edition(e) table.insert(self.editions, e) end
    function joker:add_sticker(s) table.insert(self.stickers, s) end
    table.insert(created, joker)
    table.insert(G.jokers.cards, joker)
    return joker
end
function SMODS.change_free_rerolls(n) free_rerolls = free_rerolls + n end
function SMODS.find_card(key) return held[key] or {} end

card = {ability = {extra = {}}}
context = {}
"#;

/// A fresh mocked runtime.
pub struct Runtime {
    pub lua: Lua,
}

impl Runtime {
    pub fn new() -> Self {
        let lua = Lua::new();
        lua.load(PRELUDE).set_name("prelude").exec().expect("prelude loads");
        Self { lua }
    }

    /// Run statements.
    pub fn exec(&self, source: &str) {
        if let Err(err) = self.lua.load(source).exec() {
            panic!("lua failed: {}\n--- source ---\n{}", err, source);
        }
    }

    /// Evaluate an expression.
    pub fn eval<T: for<'lua> FromLua<'lua>>(&self, expr: &str) -> T {
        match self.lua.load(format!("return {}", expr)).eval() {
            Ok(value) => value,
            Err(err) => panic!("lua failed: {}\n--- expression ---\n{}", err, expr),
        }
    }

    pub fn eval_bool(&self, expr: &str) -> bool {
        self.eval(expr)
    }

    pub fn number(&self, expr: &str) -> f64 {
        self.eval(expr)
    }

    /// Call a rendered `function() ... end`.
    pub fn call_func(&self, func: &str) -> bool {
        self.eval(&format!("({})()", func))
    }

    /// Write declared config into `card.ability.extra`.
    pub fn load_config(&self, config: &[ConfigVariable]) {
        for var in config {
            self.exec(&format!("card.ability.extra.{} = {}", var.name, var.value));
        }
    }

    /// `context.<field> = {cards of these suits}`
    pub fn set_cards(&self, field: &str, suits: &[&str]) {
        let cards = suits
            .iter()
            .map(|s| format!("make_card({:?})", s))
            .collect::<Vec<_>>()
            .join(", ");
        self.exec(&format!("context.{} = {{{}}}", field, cards));
    }

    /// Mark a joker key as held, for `SMODS.find_card`.
    pub fn hold(&self, runtime_key: &str) {
        self.exec(&format!("held[{:?}] = {{{{}}}}", runtime_key));
    }

    pub fn release(&self, runtime_key: &str) {
        self.exec(&format!("held[{:?}] = nil", runtime_key));
    }

    pub fn messages(&self) -> Vec<String> {
        self.eval("messages")
    }
}
